//! Aerodex server entry point
//!
//! Parses CLI arguments, wires the Amadeus client, cache, and snapshot
//! store into an `AirportLocator`, and serves the HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use aerodex::api::{create_routes, AppState};
use aerodex::cache::SnapshotStore;
use aerodex::cli::Cli;
use aerodex::config::Config;
use aerodex::data::AmadeusClient;
use aerodex::service::AirportLocator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("aerodex=info,tower_http=info")),
        )
        .init();

    info!(
        port = config.port,
        ttl_hours = cli.ttl_hours,
        amadeus_configured = config.credentials.is_some(),
        persist = config.persist,
        "Starting aerodex"
    );
    if config.credentials.is_none() {
        warn!("Amadeus credentials not set; lookups will fail until AMADEUS_CLIENT_ID and AMADEUS_CLIENT_SECRET are provided");
    }

    let client =
        AmadeusClient::new(config.credentials.clone()).with_base_url(config.amadeus_url.clone());

    let store = if config.persist {
        match config.cache_dir.clone() {
            Some(dir) => Some(SnapshotStore::with_dir(dir, config.ttl)),
            None => {
                let store = SnapshotStore::new(config.ttl);
                if store.is_none() {
                    warn!("No platform cache directory available; running without persistence");
                }
                store
            }
        }
    } else {
        None
    };

    let locator = Arc::new(AirportLocator::new(client, config.ttl, store));
    let app = create_routes(AppState { locator });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
