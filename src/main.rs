//! Dynamic upstream registry server.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────────────┐
//!                  │               UPSTREAM REGISTRY SERVER              │
//!                  │                                                    │
//!  Admin request   │  ┌─────────┐   ┌────────────┐   ┌──────────────┐  │
//!  ────────────────┼─▶│  http   │──▶│   admin    │──▶│   registry   │  │
//!                  │  │ server  │   │ validation │   │  + counters  │  │
//!                  │  └─────────┘   └────────────┘   └──────┬───────┘  │
//!                  │                                        │          │
//!                  │                                        ▼          │
//!  Proxying layer  │  ┌─────────┐   ┌────────────┐   ┌──────────────┐  │
//!  ◀───────────────┼──│ /select │◀──│  balancer  │◀──│ persistence  │  │
//!                  │  └─────────┘   └────────────┘   │    bridge    │  │
//!                  │                                 └──────────────┘  │
//!                  └────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use dynamic_upstreams::config::{loader, schema::AppConfig};
use dynamic_upstreams::http::server::{AppState, HttpServer};
use dynamic_upstreams::{observability, Shutdown};

#[derive(Parser)]
#[command(name = "dynamic-upstreams")]
#[command(about = "Dynamic upstream registry and load-balancing selector")]
struct Args {
    /// Path to the TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => loader::load_config(path)?,
        None => AppConfig::default(),
    };

    observability::logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        registry = %config.registry.name,
        strategy = ?config.registry.strategy,
        seed_upstreams = config.registry.upstreams.len(),
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let state = AppState::from_config(&config);
    state.ensure_loaded();

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = HttpServer::with_state(state);
    server.run(listener, receiver).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
