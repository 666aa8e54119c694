//! Parsing helpers for configuration values and their error type.

use std::time::Duration;

use thiserror::Error;

/// Why a probe configuration could not be loaded or used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML file could not be read.
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// The YAML file is not a valid probe configuration.
    #[error("failed to parse YAML config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// A host, port or timeout value is out of range.
    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Parse the `--timeout` argument (and `SIGNAL_PROBE_TIMEOUT`).
///
/// Accepts humantime text such as `5s`, `500ms` or `1m30s`; a bare number has
/// no unit and is rejected.
///
/// # Examples
///
/// ```
/// use signal_probe::config::parse_duration;
///
/// assert_eq!(parse_duration("5s").unwrap().as_secs(), 5);
/// assert_eq!(parse_duration("500ms").unwrap().as_millis(), 500);
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("duration string is empty".to_string());
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Resolve `${VAR}` and `${VAR:-default}` references in a credential.
///
/// Lets `api_key` in a config file point at a secret kept in the environment.
/// An unset variable without a default expands to an empty string, which the
/// loader then treats as "no credential".
pub fn expand_env_vars(input: &str) -> String {
    static ENV_VAR_REGEX: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();

    let regex = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("credential reference pattern is valid")
    });

    regex
        .replace_all(input, |caps: &regex::Captures| {
            let var_name = &caps[1];
            let default_value = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var_name).unwrap_or_else(|_| default_value.to_string())
        })
        .into_owned()
}
