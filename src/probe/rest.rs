//! HTTP REST probe.
//!
//! POSTs the signal as JSON to the server root and expects `200` with a JSON
//! body.

use std::time::Duration;

use reqwest::Client;
use tokio::time::timeout;

use crate::config::ProbeConfig;
use crate::probe::traits::{Probe, ProbeError, Reply, TransportKind, parse_json_reply};
use crate::signal::Signal;

/// Status treated as a successful delivery.
pub const EXPECTED_STATUS: u16 = 200;

/// REST transport probe.
pub struct RestProbe {
    url: String,
    api_key: Option<String>,
    timeout: Duration,
    client: Client,
}

impl RestProbe {
    /// Create a REST probe for `http://{host}:{port}/`.
    ///
    /// # Errors
    /// Returns `ProbeError::Network` if the HTTP client cannot be built.
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let client = build_client(config.timeout)?;

        Ok(Self {
            url: format!("http://{}/", config.authority()),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
            client,
        })
    }

    async fn round_trip(&self, signal: &Signal) -> Result<Reply, ProbeError> {
        let mut request = self.client.post(&self.url).json(signal);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_http_error(&e, self.timeout))?;
        let status = response.status().as_u16();
        tracing::debug!(url = %self.url, status = status, "REST response received");

        let text = response
            .text()
            .await
            .map_err(|e| classify_http_error(&e, self.timeout))?;
        let body = parse_json_reply(&text)?;

        if status != EXPECTED_STATUS {
            return Err(ProbeError::UnexpectedStatus { status, body });
        }

        Ok(Reply {
            status: Some(status),
            body,
        })
    }
}

impl std::fmt::Debug for RestProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestProbe")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .field("authenticated", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Probe for RestProbe {
    fn transport(&self) -> TransportKind {
        TransportKind::Rest
    }

    fn target(&self) -> String {
        self.url.clone()
    }

    async fn exchange(&self, signal: &Signal) -> Result<Reply, ProbeError> {
        timeout(self.timeout, self.round_trip(signal))
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
    }
}

/// Build an HTTP client bounded by `timeout`.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, ProbeError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProbeError::Network(format!("failed to build HTTP client: {e}")))
}

/// Map a reqwest error onto the probe taxonomy.
///
/// Connection refusals are buried in the error source chain as an
/// `io::Error`.
pub(crate) fn classify_http_error(err: &reqwest::Error, bound: Duration) -> ProbeError {
    if err.is_timeout() {
        return ProbeError::Timeout(bound);
    }

    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return ProbeError::ConnectionRefused;
            }
        }
        source = inner.source();
    }

    if err.is_decode() {
        return ProbeError::MalformedResponse(err.to_string());
    }

    ProbeError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Bind a loopback listener, or `None` where binding is not permitted.
    async fn bind_loopback() -> Option<TcpListener> {
        match TcpListener::bind("127.0.0.1:0").await {
            Ok(l) => Some(l),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => None,
            Err(e) => panic!("Failed to bind test listener: {e}"),
        }
    }

    /// Serve one canned HTTP response and return the raw request.
    async fn serve_once(listener: TcpListener, response: &'static str) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let length = text[..header_end]
                    .lines()
                    .find_map(|l| {
                        l.to_ascii_lowercase()
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    }

    #[test]
    fn test_rest_probe_url() {
        let config = ProbeConfig::new("192.168.1.100", 8080, "REST");
        let probe = RestProbe::new(&config).unwrap();
        assert_eq!(probe.target(), "http://192.168.1.100:8080/");
        assert_eq!(probe.transport(), TransportKind::Rest);
    }

    #[test]
    fn test_rest_url_ipv6_host() {
        let config = ProbeConfig::new("::1", 8080, "REST");
        let probe = RestProbe::new(&config).unwrap();
        assert_eq!(probe.target(), "http://[::1]:8080/");
    }

    #[tokio::test]
    async fn test_rest_probe_sends_bearer_and_json() {
        let Some(listener) = bind_loopback().await else {
            return;
        };
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(serve_once(
            listener,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 16\r\nConnection: close\r\n\r\n{\"status\":\"ok\"}\n",
        ));

        let config = ProbeConfig::new("127.0.0.1", port, "REST").with_api_key("s3cret");
        let probe = RestProbe::new(&config).unwrap();
        let reply = probe.exchange(&Signal::sample()).await.unwrap();

        assert_eq!(reply.status, Some(200));
        assert_eq!(reply.body["status"], "ok");

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST / HTTP/1.1"));
        assert!(lower.contains("authorization: bearer s3cret"));
        assert!(lower.contains("content-type: application/json"));
        assert!(request.contains("\"accountName\":\"Test EA\""));
    }

    #[tokio::test]
    async fn test_rest_probe_non_json_body_is_malformed() {
        let Some(listener) = bind_loopback().await else {
            return;
        };
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(serve_once(
            listener,
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
        ));

        let config = ProbeConfig::new("127.0.0.1", port, "REST");
        let probe = RestProbe::new(&config).unwrap();
        let err = probe.exchange(&Signal::sample()).await.unwrap_err();
        assert!(matches!(err, ProbeError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_rest_probe_unexpected_status() {
        let Some(listener) = bind_loopback().await else {
            return;
        };
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(serve_once(
            listener,
            "HTTP/1.1 401 Unauthorized\r\nContent-Length: 24\r\nConnection: close\r\n\r\n{\"error\":\"unauthorized\"}",
        ));

        let config = ProbeConfig::new("127.0.0.1", port, "REST");
        let probe = RestProbe::new(&config).unwrap();
        let err = probe.exchange(&Signal::sample()).await.unwrap_err();
        match err {
            ProbeError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body["error"], "unauthorized");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }
}
