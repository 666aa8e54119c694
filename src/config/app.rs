//! Probe configuration structures.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::validation::{ConfigError, expand_env_vars};

// =============================================================================
// Constants
// =============================================================================

/// Default target host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default target port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default transport name.
pub const DEFAULT_TRANSPORT: &str = "REST";

/// Default bound on a single exchange (5 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_transport() -> String {
    DEFAULT_TRANSPORT.to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

// =============================================================================
// Probe Configuration
// =============================================================================

/// Immutable settings for one probe run.
///
/// The transport is kept as the name the operator supplied; resolving it is
/// part of the probe so that an unknown name is reported like any other
/// probe failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProbeConfig {
    /// Target host (hostname or IP address).
    #[serde(default = "default_host")]
    pub host: String,

    /// Target port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Transport name (`REST`, `WebSocket`, `TCP`).
    #[serde(default = "default_transport")]
    pub transport: String,

    /// Optional bearer credential. Supports `${VAR}` expansion when loaded
    /// from a file.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Bound on the exchange (default: 5s).
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            transport: default_transport(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProbeConfig {
    /// Create a configuration for the given target.
    pub fn new(host: impl Into<String>, port: u16, transport: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            transport: transport.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    ///
    /// # Errors
    /// Returns `ConfigError` if the text cannot be parsed or validated.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.api_key = config
            .api_key
            .map(|key| expand_env_vars(&key))
            .filter(|key| !key.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The transport name is not checked here.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if any field is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ConfigError::ValidationError(
                "host cannot be empty".to_string(),
            ));
        }
        if host.chars().any(char::is_whitespace) || host.contains('/') {
            return Err(ConfigError::ValidationError(format!(
                "invalid host: '{}'",
                self.host
            )));
        }

        if self.port == 0 {
            return Err(ConfigError::ValidationError(
                "port must be non-zero".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Set the target host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the target port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the transport name.
    pub fn with_transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = transport.into();
        self
    }

    /// Set the bearer credential.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the exchange timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Apply command-line/environment values on top of this configuration.
    ///
    /// Present values win over the file; a blank credential is ignored so it
    /// cannot clear a key loaded from the file.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if the merged result is invalid.
    pub fn apply_overrides(mut self, overrides: ProbeOverrides) -> Result<Self, ConfigError> {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(transport) = overrides.transport {
            self.transport = transport;
        }
        if let Some(api_key) = overrides.api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(api_key);
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        self.validate()?;
        Ok(self)
    }

    /// `host:port` for socket connects and URLs.
    ///
    /// IPv6 literals are bracketed.
    pub fn authority(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ProbeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub transport: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}
