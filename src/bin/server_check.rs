//! Server Check Binary Entry Point
//!
//! Checks that the signal server answers GET requests locally and, when a
//! URL is given, through the public tunnel in front of it.

use clap::Parser;
use signal_probe::{
    HealthCheck,
    probe::health::DEFAULT_LOCAL_URL,
    report,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Signal server health check
#[derive(Parser, Debug)]
#[command(name = "server-check", version, about, long_about = None)]
struct Cli {
    /// Public tunnel URL to check after the local server
    remote_url: Option<String>,

    /// Local server URL
    #[arg(long, default_value = DEFAULT_LOCAL_URL, env = "SERVER_CHECK_LOCAL_URL")]
    local_url: String,
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

    println!("{}", report::banner("Server Connection Test"));

    let local = HealthCheck::local(cli.local_url)?.run().await;
    println!("{}", report::health_outcome(&local));

    match cli.remote_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => {
            let remote = HealthCheck::remote(url)?.run().await;
            println!();
            println!("{}", report::health_outcome(&remote));
        }
        None => {
            println!();
            println!("{}", report::remote_usage_hint());
        }
    }

    println!();
    println!("{}", report::rule('='));
    println!("{}", report::health_summary(local.success()));

    Ok(())
}
