//! Refclass Server Binary
//!
//! Loads the configuration and catalog, opens the annotation database and
//! serves the annotation API.

use std::sync::Arc;

use refclass_core::{AppConfig, Catalog, SqliteStorage};
use refclass_server::{serve, AppState, Submitter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("REFCLASS_CONFIG").unwrap_or_else(|_| "refclass.toml".to_string());
    let config = AppConfig::load_or_default(&config_path)?;

    let catalog = Catalog::load(&config.catalog_path)?;
    let storage = Arc::new(SqliteStorage::open(&config.database_path)?);
    let submitter = Submitter::new(config.submit_endpoint.clone());
    match submitter.endpoint() {
        Some(endpoint) => tracing::info!("Submitting classifications to {}", endpoint),
        None => tracing::warn!("No submit_endpoint configured, remote submission is disabled"),
    }

    let state = Arc::new(AppState::new(catalog, storage, submitter).with_pdf_dir(&config.pdf_dir));
    let addr = std::env::var("REFCLASS_ADDR").unwrap_or(config.bind_addr);

    serve(&addr, state).await
}
