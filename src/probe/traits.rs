//! Core probe traits and types.

use std::time::Duration;

use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::signal::Signal;

/// Supported transports for a probe exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum TransportKind {
    /// JSON POST over HTTP.
    #[strum(to_string = "REST")]
    Rest,
    /// One text frame out, one frame back.
    #[strum(to_string = "WebSocket", serialize = "ws")]
    WebSocket,
    /// Newline-terminated JSON over a raw stream socket.
    #[strum(to_string = "TCP")]
    Tcp,
}

/// Failure categories reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    ConnectionRefused,
    Timeout,
    MalformedResponse,
    UnknownTransport,
    UnexpectedStatus,
    Network,
}

/// Errors that can occur during a probe exchange.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Nothing is listening on the target port.
    #[error("connection refused; is the server running?")]
    ConnectionRefused,

    /// The exchange did not complete within the bound.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// A reply arrived but is not valid JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The transport name did not match any supported transport.
    #[error("unknown connection type: {0}")]
    UnknownTransport(String),

    /// HTTP reply with a status other than the expected one.
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16, body: Value },

    /// Any other transport failure.
    #[error("network error: {0}")]
    Network(String),
}

impl ProbeError {
    /// Category of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ConnectionRefused => FailureKind::ConnectionRefused,
            Self::Timeout(_) => FailureKind::Timeout,
            Self::MalformedResponse(_) => FailureKind::MalformedResponse,
            Self::UnknownTransport(_) => FailureKind::UnknownTransport,
            Self::UnexpectedStatus { .. } => FailureKind::UnexpectedStatus,
            Self::Network(_) => FailureKind::Network,
        }
    }

    /// Classify an I/O error from connect/read/write.
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            std::io::ErrorKind::TimedOut => Self::Network(format!("os timeout: {err}")),
            _ => Self::Network(err.to_string()),
        }
    }
}

/// Outcome of a single probe.
///
/// Produced once per invocation and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Whether the exchange succeeded.
    pub success: bool,
    /// Human-readable diagnostic, set on failure.
    pub message: Option<String>,
    /// Transport used, if the name resolved.
    pub transport: Option<TransportKind>,
    /// Failure category, set on failure.
    pub failure: Option<FailureKind>,
    /// HTTP status, when the transport has one.
    pub status: Option<u16>,
    /// Decoded reply body.
    pub response: Option<Value>,
    /// Wall time spent on the exchange.
    pub elapsed: Duration,
}

impl ProbeResult {
    pub(crate) fn succeeded(transport: TransportKind, reply: Reply, elapsed: Duration) -> Self {
        Self {
            success: true,
            message: None,
            transport: Some(transport),
            failure: None,
            status: reply.status,
            response: Some(reply.body),
            elapsed,
        }
    }

    pub(crate) fn failed(
        transport: Option<TransportKind>,
        err: ProbeError,
        elapsed: Duration,
    ) -> Self {
        let message = err.to_string();
        let failure = Some(err.kind());
        let (status, response) = match err {
            ProbeError::UnexpectedStatus { status, body } => (Some(status), Some(body)),
            _ => (None, None),
        };

        Self {
            success: false,
            message: Some(message),
            transport,
            failure,
            status,
            response,
            elapsed,
        }
    }
}

/// Decoded reply from a successful exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// HTTP status (REST only).
    pub status: Option<u16>,
    /// Reply body parsed as JSON.
    pub body: Value,
}

impl Reply {
    /// Reply without a status line.
    pub fn body(body: Value) -> Self {
        Self { status: None, body }
    }
}

/// A single request/response exchange over one transport.
///
/// Implementations perform exactly one attempt and never retry. Every
/// transport failure is returned as a [`ProbeError`]; the caller decides
/// how to report it.
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Transport this probe speaks.
    fn transport(&self) -> TransportKind;

    /// Target description for logs and reports.
    fn target(&self) -> String;

    /// Send `signal` and wait for one reply.
    async fn exchange(&self, signal: &Signal) -> Result<Reply, ProbeError>;
}

/// Parse a reply payload as JSON, trimming surrounding whitespace.
pub(crate) fn parse_json_reply(text: &str) -> Result<Value, ProbeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ProbeError::MalformedResponse("empty reply".to_string()));
    }
    serde_json::from_str(trimmed).map_err(|e| ProbeError::MalformedResponse(e.to_string()))
}
