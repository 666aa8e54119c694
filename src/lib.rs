//! Signal Probe - Trade Signal Server Connectivity Check
//!
//! This crate sends a sample trade signal to a signal server over one of
//! three transports and reports whether the round-trip succeeded. It can be
//! used as a library, or through the `signal-probe` and `server-check`
//! binaries.
//!
//! # Architecture
//!
//! - **Signal**: The fixed sample payload shared by every transport
//! - **Config**: YAML/CLI configuration resolved into an immutable [`ProbeConfig`]
//! - **Probe**: REST, WebSocket and TCP exchanges plus a GET health check
//! - **Report**: Console rendering of probe outcomes
//!
//! # Example
//!
//! ```rust,no_run
//! use signal_probe::{ProbeConfig, Signal, run_probe};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ProbeConfig::new("localhost", 8080, "WebSocket");
//!     let result = run_probe(&config, &Signal::sample()).await;
//!     if !result.success {
//!         eprintln!("{}", result.message.unwrap_or_default());
//!     }
//! }
//! ```

pub mod config;
pub mod probe;
pub mod report;
pub mod signal;

pub use config::{ConfigError, ProbeConfig};
pub use probe::{
    FailureKind, HealthCheck, HealthOutcome, Probe, ProbeError, ProbeResult, TransportKind,
    run_probe,
};
pub use signal::Signal;
