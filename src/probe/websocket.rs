//! WebSocket probe.
//!
//! Sends the signal as one text frame and waits for a single reply frame.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite, tungstenite::Message};

use crate::config::ProbeConfig;
use crate::probe::traits::{Probe, ProbeError, Reply, TransportKind, parse_json_reply};
use crate::signal::Signal;

/// WebSocket transport probe.
#[derive(Debug, Clone)]
pub struct WebSocketProbe {
    url: String,
    timeout: Duration,
}

impl WebSocketProbe {
    /// Create a probe for `ws://{host}:{port}/`.
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            url: format!("ws://{}/", config.authority()),
            timeout: config.timeout,
        }
    }

    async fn round_trip(&self, payload: String) -> Result<Reply, ProbeError> {
        let (mut ws, _) = connect_async(&self.url).await.map_err(classify_ws_error)?;
        tracing::debug!(url = %self.url, "WebSocket connected");

        ws.send(Message::Text(payload.into()))
            .await
            .map_err(classify_ws_error)?;
        tracing::info!(url = %self.url, "Signal sent, waiting for response");

        let reply = loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => break parse_json_reply(text.as_str()),
                Some(Ok(Message::Binary(bytes))) => {
                    break match std::str::from_utf8(&bytes) {
                        Ok(text) => parse_json_reply(text),
                        Err(e) => Err(ProbeError::MalformedResponse(format!(
                            "binary reply is not UTF-8: {e}"
                        ))),
                    };
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Ok(Message::Close(_))) | None => {
                    break Err(ProbeError::Network(
                        "connection closed before reply".to_string(),
                    ));
                }
                Some(Err(e)) => break Err(classify_ws_error(e)),
            }
        };

        if let Err(e) = ws.close(None).await {
            tracing::debug!(url = %self.url, error = %e, "WebSocket close failed");
        }

        reply.map(Reply::body)
    }
}

#[async_trait::async_trait]
impl Probe for WebSocketProbe {
    fn transport(&self) -> TransportKind {
        TransportKind::WebSocket
    }

    fn target(&self) -> String {
        self.url.clone()
    }

    async fn exchange(&self, signal: &Signal) -> Result<Reply, ProbeError> {
        let payload = signal
            .to_json()
            .map_err(|e| ProbeError::Network(format!("failed to encode signal: {e}")))?;

        timeout(self.timeout, self.round_trip(payload))
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
    }
}

fn classify_ws_error(err: tungstenite::Error) -> ProbeError {
    match err {
        tungstenite::Error::Io(ref io) => ProbeError::from_io(io),
        tungstenite::Error::Http(ref response) => ProbeError::Network(format!(
            "handshake rejected with HTTP {}",
            response.status()
        )),
        other => ProbeError::Network(other.to_string()),
    }
}
