//! SPA gateway (v1)
//!
//! Hosts a single-page application's route table over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                   SPA GATEWAY                     │
//!   Navigation       │  ┌────────┐    ┌──────────────┐    ┌──────────┐  │
//!   GET /base/path ──┼─▶│  http  │───▶│   routing    │───▶│  views   │  │
//!                    │  │ server │    │ route table  │    │ loaders  │  │
//!                    │  └────────┘    └──────┬───────┘    └──────────┘  │
//!   View / 404 / 503 │      ▲                │ current route            │
//!   ◀────────────────┼──────┘                ▼                          │
//!                    │                ┌──────────────┐                  │
//!                    │                │    admin     │◀── gateway-cli   │
//!                    │                └──────────────┘                  │
//!                    │  config · lifecycle · observability              │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use spa_gateway::admin::{setup_admin_router, AdminState};
use spa_gateway::config::{load_config, loader::apply_overrides, GatewayConfig};
use spa_gateway::http::HttpServer;
use spa_gateway::lifecycle::{build_route_table, signals, Shutdown};
use spa_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "spa-gateway")]
#[command(about = "Serve a single-page application's route table", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = GatewayConfig::default();
            apply_overrides(&mut config, |key| std::env::var(key).ok());
            config
        }
    };

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "spa-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.app.base_url,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let table = Arc::new(build_route_table(&config)?);

    let shutdown = Shutdown::new();
    tokio::spawn(signals::forward_signals(shutdown.clone()));

    if config.admin.enabled {
        let admin = setup_admin_router(AdminState {
            table: table.clone(),
            api_key: Arc::from(config.admin.api_key.as_str()),
        });
        let listener = TcpListener::bind(&config.admin.bind_address).await?;
        tracing::info!(address = %listener.local_addr()?, "Admin API listening");

        let signal = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, admin).with_graceful_shutdown(signal.recv()).await {
                tracing::error!(error = %e, "Admin API stopped");
            }
        });
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, table);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
