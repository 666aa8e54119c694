//! Transport selection and probe execution.

use std::time::{Duration, Instant};

use crate::config::ProbeConfig;
use crate::probe::rest::RestProbe;
use crate::probe::tcp::TcpProbe;
use crate::probe::traits::{Probe, ProbeError, ProbeResult, TransportKind};
use crate::probe::websocket::WebSocketProbe;
use crate::signal::Signal;

/// Resolve a transport by name.
///
/// # Errors
/// Returns `ProbeError::UnknownTransport` carrying the name as given.
pub fn resolve_transport(name: &str) -> Result<TransportKind, ProbeError> {
    name.trim()
        .parse()
        .map_err(|_| ProbeError::UnknownTransport(name.to_string()))
}

/// Build the probe for an already resolved transport.
///
/// # Errors
/// Returns `ProbeError::Network` if the transport client cannot be built.
pub fn build_probe(
    kind: TransportKind,
    config: &ProbeConfig,
) -> Result<Box<dyn Probe>, ProbeError> {
    let probe: Box<dyn Probe> = match kind {
        TransportKind::Rest => Box::new(RestProbe::new(config)?),
        TransportKind::WebSocket => Box::new(WebSocketProbe::new(config)),
        TransportKind::Tcp => Box::new(TcpProbe::new(config)),
    };
    Ok(probe)
}

/// Perform one exchange with `probe` and record the outcome.
///
/// Never fails: transport errors become a failed [`ProbeResult`].
pub async fn execute(probe: &dyn Probe, signal: &Signal) -> ProbeResult {
    let transport = probe.transport();
    let target = probe.target();
    tracing::info!(transport = %transport, target = %target, "Starting probe");

    let start = Instant::now();
    let result = probe.exchange(signal).await;
    let elapsed = start.elapsed();
    let latency_ms = elapsed.as_secs_f64() * 1000.0;

    match result {
        Ok(reply) => {
            tracing::debug!(
                transport = %transport,
                target = %target,
                latency_ms = latency_ms,
                "Probe successful"
            );
            ProbeResult::succeeded(transport, reply, elapsed)
        }
        Err(e) => {
            tracing::warn!(
                transport = %transport,
                target = %target,
                category = %e.kind(),
                error = %e,
                latency_ms = latency_ms,
                "Probe failed"
            );
            ProbeResult::failed(Some(transport), e, elapsed)
        }
    }
}

/// Resolve the configured transport and run a single probe.
///
/// An unknown transport fails immediately without touching the network.
pub async fn run_probe(config: &ProbeConfig, signal: &Signal) -> ProbeResult {
    let kind = match resolve_transport(&config.transport) {
        Ok(kind) => kind,
        Err(e) => {
            tracing::warn!(transport = %config.transport, error = %e, "Probe not attempted");
            return ProbeResult::failed(None, e, Duration::ZERO);
        }
    };

    match build_probe(kind, config) {
        Ok(probe) => execute(probe.as_ref(), signal).await,
        Err(e) => {
            tracing::warn!(transport = %kind, error = %e, "Probe not attempted");
            ProbeResult::failed(Some(kind), e, Duration::ZERO)
        }
    }
}
