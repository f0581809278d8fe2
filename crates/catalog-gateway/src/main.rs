//! Catalog Gateway - product catalog REST API
//!
//! This is the main entry point for the gateway service.
//!
//! # Configuration
//!
//! `API_KEY` is required. See [`GatewayConfig::from_env`] for the optional
//! variables. Set `SEED_SAMPLE_DATA=false` to start with an empty catalog.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_gateway::{create_router, GatewayConfig, GatewayState};
use catalog_store::{seed, InMemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Catalog Gateway");

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        listen_addr = %config.listen_addr,
        cors_origins = ?config.cors_origins,
        max_body_bytes = config.max_body_bytes,
        request_timeout_seconds = config.request_timeout_seconds,
        seed_sample_data = config.seed_sample_data,
        "Gateway configuration loaded"
    );

    let store = if config.seed_sample_data {
        InMemoryStore::with_products(seed::sample_catalog())?
    } else {
        InMemoryStore::new()
    };
    tracing::info!(products = store.len(), "Catalog store initialized");

    let listen_addr = config.listen_addr.clone();
    let state = GatewayState::new(Arc::new(store), config);

    let app = create_router(state)?;
    tracing::info!("Router configured with all API endpoints");

    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Catalog Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
