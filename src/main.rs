//! Signal Probe Binary Entry Point
//!
//! Sends the sample trade signal to a server over the selected transport and
//! prints whether the round-trip succeeded. The process exits successfully
//! whatever the probe outcome; only configuration errors are fatal.

use std::time::Duration;

use clap::Parser;
use signal_probe::{
    ProbeConfig, Signal,
    config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TRANSPORT, ProbeOverrides, parse_duration},
    report, run_probe,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Trade signal server connectivity probe
#[derive(Parser, Debug)]
#[command(name = "signal-probe", version, about, long_about = None)]
struct Cli {
    /// Server host (default: localhost)
    #[arg(env = "SIGNAL_PROBE_HOST")]
    host: Option<String>,

    /// Server port (default: 8080)
    #[arg(env = "SIGNAL_PROBE_PORT")]
    port: Option<u16>,

    /// Connection type: REST, WebSocket or TCP (default: REST)
    #[arg(env = "SIGNAL_PROBE_TRANSPORT")]
    transport: Option<String>,

    /// Path to an optional YAML configuration file
    #[arg(short, long, env = "SIGNAL_PROBE_CONFIG")]
    config: Option<String>,

    /// Bearer token sent with REST requests
    #[arg(long, env = "SIGNAL_PROBE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Exchange timeout, e.g. `5s` or `500ms`
    #[arg(long, env = "SIGNAL_PROBE_TIMEOUT", value_parser = parse_duration)]
    timeout: Option<Duration>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,signal_probe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let file_config = match cli.config {
        Some(ref path) => {
            tracing::info!("Loading configuration from: {}", path);
            ProbeConfig::load(path)?
        }
        None => ProbeConfig::new(DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TRANSPORT),
    };

    // CLI > ENV > config file
    let config = file_config.apply_overrides(ProbeOverrides {
        host: cli.host,
        port: cli.port,
        transport: cli.transport,
        api_key: cli.api_key,
        timeout: cli.timeout,
    })?;

    tracing::debug!(
        "Target: {}, transport: {}, timeout: {:?}, authenticated: {}",
        config.authority(),
        config.transport,
        config.timeout,
        config.api_key.is_some(),
    );

    println!("{}", report::probe_header(&config));
    println!();

    let signal = Signal::sample();
    println!("{}", report::signal_block(&signal));
    println!();

    let result = run_probe(&config, &signal).await;
    println!("{}", report::probe_outcome(&result));
    println!();
    println!("{}", report::verdict(result.success));

    Ok(())
}
