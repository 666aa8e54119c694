//! Raw TCP probe.
//!
//! Writes the signal as newline-terminated JSON and reads a single reply
//! chunk.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::ProbeConfig;
use crate::probe::traits::{Probe, ProbeError, Reply, TransportKind, parse_json_reply};
use crate::signal::Signal;

/// Maximum reply size read from the socket.
pub const MAX_REPLY_BYTES: usize = 1024;

/// Frame terminator appended to the request.
const FRAME_TERMINATOR: u8 = b'\n';

/// TCP transport probe.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    authority: String,
    timeout: Duration,
}

impl TcpProbe {
    /// Create a probe for `{host}:{port}`.
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            authority: config.authority(),
            timeout: config.timeout,
        }
    }

    async fn round_trip(&self, mut frame: Vec<u8>) -> Result<Reply, ProbeError> {
        let mut stream = TcpStream::connect(&self.authority)
            .await
            .map_err(|e| ProbeError::from_io(&e))?;

        frame.push(FRAME_TERMINATOR);
        stream
            .write_all(&frame)
            .await
            .map_err(|e| ProbeError::from_io(&e))?;
        tracing::info!(target_addr = %self.authority, "Signal sent, waiting for response");

        // One read; a reply without a terminator is parsed as-is.
        let mut buf = vec![0u8; MAX_REPLY_BYTES];
        let n = stream
            .read(&mut buf)
            .await
            .map_err(|e| ProbeError::from_io(&e))?;
        if n == 0 {
            return Err(ProbeError::MalformedResponse(
                "connection closed without a reply".to_string(),
            ));
        }

        let text = std::str::from_utf8(&buf[..n])
            .map_err(|e| ProbeError::MalformedResponse(format!("reply is not UTF-8: {e}")))?;
        parse_json_reply(text).map(Reply::body)
    }
}

#[async_trait::async_trait]
impl Probe for TcpProbe {
    fn transport(&self) -> TransportKind {
        TransportKind::Tcp
    }

    fn target(&self) -> String {
        self.authority.clone()
    }

    async fn exchange(&self, signal: &Signal) -> Result<Reply, ProbeError> {
        let frame = serde_json::to_vec(signal)
            .map_err(|e| ProbeError::Network(format!("failed to encode signal: {e}")))?;

        timeout(self.timeout, self.round_trip(frame))
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
    }
}
