//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::services::EmailService;
use crate::state::AppState;
use anyhow::{Context, Result};
use sharebox_core::{Config, DisabledShareNotifier, ShareNotifier};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.environment());

    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;
    validation::validate_config(&config)?;
    tracing::info!("Configuration loaded and validated successfully");

    let sessions = database::setup_repository(&config).await?;
    let storage = storage::setup_storage(&config).await?;
    let notifier = setup_notifier(&config);

    let state = Arc::new(AppState::new(config.clone(), sessions, storage, notifier));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

fn setup_notifier(config: &Config) -> Arc<dyn ShareNotifier> {
    match EmailService::from_config(config) {
        Some(service) => Arc::new(service),
        None => {
            tracing::info!("Email notifications disabled, EMAIL shares will not be delivered");
            Arc::new(DisabledShareNotifier)
        }
    }
}
