//! partyperms resolve server
//!
//! Run with: cargo run --features server --bin partyperms-server
//!
//! Environment:
//!   PORT                  listen port (default 3000)
//!   PARTYPERMS_CATALOG    optional catalog config JSON file
//!   RUST_LOG              tracing filter (default "info")

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use partyperms::{server, CatalogConfig, CatalogError, PermissionCatalog};

fn load_catalog() -> Result<PermissionCatalog, CatalogError> {
    match std::env::var("PARTYPERMS_CATALOG") {
        Ok(path) => PermissionCatalog::from_config(&CatalogConfig::load(path)?),
        Err(_) => Ok(PermissionCatalog::standard()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = server::router(Arc::new(load_catalog()?));

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    info!(%addr, "partyperms server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
