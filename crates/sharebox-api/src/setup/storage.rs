//! Storage setup and initialization

use anyhow::{Context, Result};
use sharebox_core::Config;
use sharebox_storage::{create_storage, Storage};
use std::sync::Arc;

/// Setup the blob store for the configured backend
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}
