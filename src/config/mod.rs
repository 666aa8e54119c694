//! Configuration module for the signal probe.
//!
//! Provides YAML-based configuration loading and validation for:
//! - Target settings (host, port, transport)
//! - Bearer credential with environment variable expansion
//! - Probe timeout

mod app;
mod validation;

pub use app::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT, DEFAULT_TRANSPORT, ProbeConfig,
    ProbeOverrides,
};
pub use validation::{ConfigError, expand_env_vars, parse_duration};
