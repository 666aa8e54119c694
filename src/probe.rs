//! Probe Layer
//!
//! One request/response exchange with a trade signal server over a
//! selectable transport. Each probe makes exactly one attempt with a bounded
//! wait and reports the outcome as a [`ProbeResult`].
//!
//! # Architecture
//!
//! - [`Probe`]: Core trait, one implementation per [`TransportKind`]
//! - [`run_probe`]: Resolves the transport by name and runs one exchange
//! - [`HealthCheck`]: GET-based check of a local server and its tunnel
//!
//! # Example
//!
//! ```rust,no_run
//! use signal_probe::{ProbeConfig, Signal, run_probe};
//!
//! # async fn demo() {
//! let config = ProbeConfig::new("127.0.0.1", 8080, "TCP");
//! let result = run_probe(&config, &Signal::sample()).await;
//! println!("success: {}", result.success);
//! # }
//! ```

mod dispatch;
pub mod health;
pub mod rest;
pub mod tcp;
mod traits;
pub mod websocket;

pub use dispatch::{build_probe, execute, resolve_transport, run_probe};
pub use health::{CheckScope, HealthCheck, HealthOutcome};
pub use traits::{FailureKind, Probe, ProbeError, ProbeResult, Reply, TransportKind};
