//! Server health check.
//!
//! A narrower probe that skips transport selection: it issues one GET to a
//! local endpoint and, optionally, to a public tunnel URL in front of it.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;
use strum_macros::Display;
use tokio::time::timeout;

use crate::probe::rest::{build_client, classify_http_error};
use crate::probe::traits::{FailureKind, ProbeError, parse_json_reply};

/// Default local endpoint.
pub const DEFAULT_LOCAL_URL: &str = "http://localhost:8080/";

/// Bound on the local check (5 seconds).
pub const LOCAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound on the remote check (10 seconds).
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Which side of the tunnel a check targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CheckScope {
    #[strum(to_string = "local server")]
    Local,
    #[strum(to_string = "remote tunnel")]
    Remote,
}

/// One GET health check.
pub struct HealthCheck {
    scope: CheckScope,
    url: String,
    timeout: Duration,
    client: Client,
}

impl HealthCheck {
    /// Check the local server at `url` with [`LOCAL_TIMEOUT`].
    ///
    /// # Errors
    /// Returns `ProbeError::Network` if the HTTP client cannot be built.
    pub fn local(url: impl Into<String>) -> Result<Self, ProbeError> {
        Self::new(CheckScope::Local, url.into(), LOCAL_TIMEOUT)
    }

    /// Check a remote tunnel URL with [`REMOTE_TIMEOUT`].
    ///
    /// Bare hostnames get an `https://` prefix.
    ///
    /// # Errors
    /// Returns `ProbeError::Network` if the HTTP client cannot be built.
    pub fn remote(url: &str) -> Result<Self, ProbeError> {
        Self::new(CheckScope::Remote, normalize_remote_url(url), REMOTE_TIMEOUT)
    }

    fn new(scope: CheckScope, url: String, bound: Duration) -> Result<Self, ProbeError> {
        Ok(Self {
            scope,
            url,
            timeout: bound,
            client: build_client(bound)?,
        })
    }

    /// Override the bound.
    pub fn with_timeout(mut self, bound: Duration) -> Result<Self, ProbeError> {
        self.client = build_client(bound)?;
        self.timeout = bound;
        Ok(self)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn scope(&self) -> CheckScope {
        self.scope
    }

    /// Run the check once.
    pub async fn run(&self) -> HealthOutcome {
        let start = Instant::now();
        let result = timeout(self.timeout, self.fetch())
            .await
            .unwrap_or_else(|_| Err(ProbeError::Timeout(self.timeout)));
        let elapsed = start.elapsed();

        let (status, body, error) = match result {
            Ok((status, body)) => {
                tracing::debug!(scope = %self.scope, url = %self.url, status = status, "Health check successful");
                (Some(status), Some(body), None)
            }
            Err(e) => {
                tracing::warn!(scope = %self.scope, url = %self.url, error = %e, "Health check failed");
                (None, None, Some(e))
            }
        };

        HealthOutcome {
            scope: self.scope,
            url: self.url.clone(),
            status,
            body,
            error,
            elapsed,
        }
    }

    async fn fetch(&self) -> Result<(u16, Value), ProbeError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| classify_http_error(&e, self.timeout))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| classify_http_error(&e, self.timeout))?;
        Ok((status, parse_json_reply(&text)?))
    }
}

impl std::fmt::Debug for HealthCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCheck")
            .field("scope", &self.scope)
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Result of one health check.
#[derive(Debug)]
pub struct HealthOutcome {
    pub scope: CheckScope,
    pub url: String,
    /// HTTP status, when a response arrived.
    pub status: Option<u16>,
    /// Response body, when it decoded as JSON.
    pub body: Option<Value>,
    pub error: Option<ProbeError>,
    pub elapsed: Duration,
}

impl HealthOutcome {
    /// A response arrived and its body decoded as JSON.
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.error.as_ref().map(ProbeError::kind)
    }

    /// Remediation hints for a failed check.
    pub fn hints(&self) -> Vec<String> {
        let Some(kind) = self.failure() else {
            return Vec::new();
        };

        match (self.scope, kind) {
            (CheckScope::Local, FailureKind::ConnectionRefused) => vec![
                format!("Server is NOT running on {}", self.url),
                "Start the server in the app (Server tab -> Start Server)".to_string(),
            ],
            (CheckScope::Local, FailureKind::Timeout) => {
                vec!["Server might be starting or blocked".to_string()]
            }
            (CheckScope::Remote, FailureKind::Timeout) => vec![
                "Tunnel is running but can't reach your server".to_string(),
                format!("Make sure the server is running on {DEFAULT_LOCAL_URL}"),
            ],
            (CheckScope::Remote, FailureKind::ConnectionRefused) => {
                vec!["Tunnel endpoint refused the connection; is the tunnel running?".to_string()]
            }
            _ => Vec::new(),
        }
    }
}

/// Prefix bare hosts with `https://`.
pub fn normalize_remote_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(scope: CheckScope, error: Option<ProbeError>) -> HealthOutcome {
        HealthOutcome {
            scope,
            url: DEFAULT_LOCAL_URL.to_string(),
            status: None,
            body: None,
            error,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_normalize_remote_url() {
        assert_eq!(
            normalize_remote_url("abc.ngrok-free.dev"),
            "https://abc.ngrok-free.dev"
        );
        assert_eq!(
            normalize_remote_url("http://abc.example:8080"),
            "http://abc.example:8080"
        );
        assert_eq!(
            normalize_remote_url(" https://abc.example "),
            "https://abc.example"
        );
    }

    #[test]
    fn test_remote_check_uses_longer_timeout() {
        let check = HealthCheck::remote("tunnel.example").unwrap();
        assert_eq!(check.scope(), CheckScope::Remote);
        assert_eq!(check.url(), "https://tunnel.example");
        assert_eq!(check.timeout, REMOTE_TIMEOUT);

        let local = HealthCheck::local(DEFAULT_LOCAL_URL).unwrap();
        assert_eq!(local.timeout, LOCAL_TIMEOUT);
    }

    #[test]
    fn test_hints_for_local_refused() {
        let hints = outcome(CheckScope::Local, Some(ProbeError::ConnectionRefused)).hints();
        assert_eq!(hints.len(), 2);
        assert!(hints[1].contains("Start the server"));
    }

    #[test]
    fn test_hints_for_remote_timeout() {
        let hints = outcome(
            CheckScope::Remote,
            Some(ProbeError::Timeout(REMOTE_TIMEOUT)),
        )
        .hints();
        assert!(hints[0].contains("can't reach your server"));
    }

    #[test]
    fn test_no_hints_on_success_or_generic_error() {
        assert!(outcome(CheckScope::Local, None).hints().is_empty());
        assert!(
            outcome(CheckScope::Local, Some(ProbeError::Network("dns".into())))
                .hints()
                .is_empty()
        );
    }
}
