//! Configuration validation
//!
//! Checks the HTTP-facing settings at startup, on top of the field checks
//! `Config::validate` already performs.

use anyhow::Result;
use sharebox_core::{Config, PersistenceBackend};

/// Validate critical configuration values
///
/// Fails fast on settings that would be unsafe or unusable once the server is
/// accepting uploads.
pub fn validate_config(config: &Config) -> Result<()> {
    let is_production = config.is_production();

    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via CORS_ORIGINS."
        ));
    }

    if config.persistence_backend() == PersistenceBackend::Postgres {
        if config.db_max_connections() == 0 {
            return Err(anyhow::anyhow!("Database max connections cannot be 0"));
        }
        if config.db_timeout_seconds() == 0 {
            return Err(anyhow::anyhow!("Database timeout cannot be 0"));
        }
    }

    if is_production && config.persistence_backend() == PersistenceBackend::Memory {
        tracing::warn!("In-memory persistence in production - sessions will not survive a restart");
    }

    if is_production && !config.public_base_url().starts_with("https://") {
        tracing::warn!(
            public_base_url = %config.public_base_url(),
            "PUBLIC_BASE_URL is not https - share links will be sent over plain HTTP"
        );
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
