//! mlstockprice Server - headless prediction endpoints
//!
//! Hosts every configured endpoint over HTTP. Artifacts are loaded once at
//! startup; an endpoint whose artifact fails to load stays registered and
//! answers 503 instead of scoring.
//!
//! # Usage
//! ```sh
//! SERVER_PORT=8080 cargo run --bin server
//! cargo run --bin server -- --config endpoints.example.toml
//! ```
//!
//! # Environment Variables
//! - `ENDPOINTS_CONFIG` - TOML endpoint descriptor (overrides the variables below)
//! - `MODEL_PATH` / `SIMPLE_MODEL_PATH` - artifact locations
//! - `DATE_FORMAT` - strftime pattern for request dates (default: %d/%m/%Y)
//! - `SERVER_BIND_ADDRESS` / `SERVER_PORT` - listen address (default: 127.0.0.1:8080)

use anyhow::{Context, Result};
use clap::Parser;
use mlstockprice::application::prediction_service::PredictionService;
use mlstockprice::config::Config;
use mlstockprice::interfaces::http::{ApiState, router};
use std::path::PathBuf;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML endpoint descriptor; falls back to environment variables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stdout only, no UI channel needed)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let args = Args::parse();
    info!("mlstockprice server {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let services: Vec<PredictionService> = config
        .endpoints
        .iter()
        .map(PredictionService::from_config)
        .collect();

    for service in &services {
        match service.unavailable_reason() {
            None => info!("POST /predict/{} -> ready", service.endpoint()),
            Some(reason) => warn!("POST /predict/{} -> disabled ({})", service.endpoint(), reason),
        }
    }

    let app = router(ApiState::new(services));

    let address = config.server.socket_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received. Exiting...");
        })
        .await?;

    Ok(())
}
