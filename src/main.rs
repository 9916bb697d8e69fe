//! touchline — football data gateway.
//!
//! A single-binary HTTP gateway that fronts a rate-limited football-data
//! provider for the dashboard.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────┐
//!                  │                   GATEWAY                      │
//! Client Request   │  ┌──────┐   ┌──────────┐   ┌───────────────┐  │
//! ─────────────────┼─▶│ http │──▶│ security │──▶│     cache     │  │
//!                  │  └──────┘   │rate limit│   └───────┬───────┘  │
//!                  │             │validation│           │ miss     │
//!                  │             └──────────┘           ▼          │
//!                  │                            ┌───────────────┐  │
//! Client Response  │                            │   provider    │  │     Football-data
//! ◀────────────────┼────────────────────────────│ retry+limiter │◀─┼──── provider API
//!                  │                            └───────────────┘  │
//!                  │  Cross-cutting: config, observability         │
//!                  └───────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use touchline::config::{load_config, GatewayConfig};
use touchline::GatewayServer;

#[derive(Parser, Debug)]
#[command(name = "touchline", about = "Football data gateway", version)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "touchline=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("touchline v0.1.0 starting");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        max_concurrent = config.limiter.max_concurrent,
        max_retries = config.retry.max_retries,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => touchline::observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = GatewayServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
