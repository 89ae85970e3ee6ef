//! Toxref Toxicology Lookup Service
//!
//! Looks up CIR safety reports and ECHA dossiers for cosmetic ingredients
//! and extracts NOAEL, LD50 and DNEL values from them.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use toxref_lookup::{create_router, LookupService, Store};
use toxref_utils::{init_logging, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting Toxref Toxicology Lookup Service");

    let store = Store::load(&config.sources).context("Failed to load lookup tables")?;
    let service = LookupService::from_config(Arc::new(store), &config)
        .context("Failed to initialize lookup service")?;

    let app = create_router(service);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Toxicology Lookup Service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
