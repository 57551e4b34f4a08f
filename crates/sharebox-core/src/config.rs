//! Configuration module
//!
//! This module provides the configuration for the Sharebox service: server,
//! persistence, storage, upload limits, share links and email delivery.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_MAX_FILES_PER_SESSION, DEFAULT_MAX_FILE_SIZE_BYTES};
use crate::storage_types::StorageBackend;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const SERVER_PORT: u16 = 3000;
const PRESIGNED_URL_TTL_SECS: u64 = 900;
const MAX_FILE_SIZE_MB: u64 = DEFAULT_MAX_FILE_SIZE_BYTES / (1024 * 1024);

/// Where file sessions are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceBackend {
    Postgres,
    /// Process-local maps; sessions are lost on restart
    Memory,
}

impl FromStr for PersistenceBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(PersistenceBackend::Postgres),
            "memory" => Ok(PersistenceBackend::Memory),
            other => Err(anyhow::anyhow!(
                "Invalid PERSISTENCE_BACKEND: {} (expected postgres or memory)",
                other
            )),
        }
    }
}

impl fmt::Display for PersistenceBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceBackend::Postgres => write!(f, "postgres"),
            PersistenceBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
}

/// File sharing configuration
#[derive(Clone, Debug)]
pub struct SharingConfig {
    pub base: BaseConfig,
    pub persistence_backend: PersistenceBackend,
    pub database_url: Option<String>,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub presigned_url_ttl_secs: u64,
    // Upload limits
    pub max_file_size_bytes: u64,
    pub max_files_per_session: usize,
    // Share links are built as {public_base_url}/files/{session_id}
    pub public_base_url: String,
    // Email delivery
    pub email_notifications_enabled: bool,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<SharingConfig>);

impl Config {
    fn as_sharing(&self) -> &SharingConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_sharing().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = SharingConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_sharing().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_sharing().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_sharing().base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_sharing().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_sharing().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_sharing().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_sharing().base.db_timeout_seconds
    }

    pub fn persistence_backend(&self) -> PersistenceBackend {
        self.as_sharing().persistence_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_sharing().database_url.as_deref()
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_sharing().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_sharing().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_sharing().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_sharing().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.as_sharing().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_sharing().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_sharing().local_storage_base_url.as_deref()
    }

    pub fn presigned_url_ttl_secs(&self) -> u64 {
        self.as_sharing().presigned_url_ttl_secs
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.as_sharing().max_file_size_bytes
    }

    pub fn max_files_per_session(&self) -> usize {
        self.as_sharing().max_files_per_session
    }

    pub fn public_base_url(&self) -> &str {
        &self.as_sharing().public_base_url
    }

    /// Link a recipient opens to view a session
    pub fn share_link(&self, session_id: uuid::Uuid) -> String {
        format!(
            "{}/files/{}",
            self.public_base_url().trim_end_matches('/'),
            session_id
        )
    }

    pub fn email_notifications_enabled(&self) -> bool {
        self.as_sharing().email_notifications_enabled
    }

    pub fn smtp_host(&self) -> Option<&str> {
        self.as_sharing().smtp_host.as_deref()
    }

    pub fn smtp_port(&self) -> Option<u16> {
        self.as_sharing().smtp_port
    }

    pub fn smtp_user(&self) -> Option<&str> {
        self.as_sharing().smtp_user.as_deref()
    }

    pub fn smtp_password(&self) -> Option<&str> {
        self.as_sharing().smtp_password.as_deref()
    }

    pub fn smtp_from(&self) -> Option<&str> {
        self.as_sharing().smtp_from.as_deref()
    }

    pub fn smtp_tls(&self) -> bool {
        self.as_sharing().smtp_tls
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .to_lowercase()
        .parse()
        .unwrap_or(default)
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Convert a megabyte setting to bytes, rejecting values that do not fit in a u64.
fn megabytes_to_bytes(megabytes: u64, var: &str) -> Result<u64, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {}", var, megabytes))
}

impl SharingConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: env::var("SERVER_PORT")
                .or_else(|_| env::var("PORT"))
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            environment,
        };

        let persistence_backend = env::var("PERSISTENCE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse::<PersistenceBackend>()?;

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .parse::<StorageBackend>()?;

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let config = SharingConfig {
            base,
            persistence_backend,
            database_url: env_opt("DATABASE_URL"),
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION"),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            aws_region: env_opt("AWS_REGION"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            presigned_url_ttl_secs: env::var("PRESIGNED_URL_TTL_SECS")
                .unwrap_or_else(|_| PRESIGNED_URL_TTL_SECS.to_string())
                .parse()
                .unwrap_or(PRESIGNED_URL_TTL_SECS),
            max_file_size_bytes: megabytes_to_bytes(max_file_size_mb, "MAX_FILE_SIZE_MB")?,
            max_files_per_session: env::var("MAX_FILES_PER_SESSION")
                .unwrap_or_else(|_| DEFAULT_MAX_FILES_PER_SESSION.to_string())
                .parse()
                .unwrap_or(DEFAULT_MAX_FILES_PER_SESSION),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", SERVER_PORT)),
            email_notifications_enabled: env_flag("EMAIL_NOTIFICATIONS_ENABLED", false),
            smtp_host: env_opt("SMTP_HOST"),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&p| p > 0),
            smtp_user: env_opt("SMTP_USER"),
            smtp_password: env_opt("SMTP_PASSWORD"),
            smtp_from: env_opt("SMTP_FROM"),
            smtp_tls: env_flag("SMTP_TLS", true),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if self.persistence_backend == PersistenceBackend::Postgres {
            match self.database_url.as_deref() {
                Some(url) if url.starts_with("postgresql://") || url.starts_with("postgres://") => {
                }
                _ => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
            }
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.max_files_per_session == 0 {
            return Err(anyhow::anyhow!(
                "MAX_FILES_PER_SESSION must be greater than 0"
            ));
        }

        if self.email_notifications_enabled
            && (self.smtp_host.is_none() || self.smtp_from.is_none())
        {
            return Err(anyhow::anyhow!(
                "EMAIL_NOTIFICATIONS_ENABLED=true requires SMTP_HOST and SMTP_FROM to be set"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> SharingConfig {
        SharingConfig {
            base: BaseConfig {
                server_port: 3000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: MAX_CONNECTIONS,
                db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
                jwt_secret: "a".repeat(32),
                environment: "development".to_string(),
            },
            persistence_backend: PersistenceBackend::Memory,
            database_url: None,
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: Some("/tmp/sharebox".to_string()),
            local_storage_base_url: Some("http://localhost:3000/media".to_string()),
            presigned_url_ttl_secs: PRESIGNED_URL_TTL_SECS,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            max_files_per_session: DEFAULT_MAX_FILES_PER_SESSION,
            public_base_url: "https://share.example.com/".to_string(),
            email_notifications_enabled: false,
            smtp_host: None,
            smtp_port: None,
            smtp_user: None,
            smtp_password: None,
            smtp_from: None,
            smtp_tls: true,
        }
    }

    #[test]
    fn test_valid_local_memory_config() {
        assert!(local_config().validate().is_ok());
    }

    #[test]
    fn test_megabytes_to_bytes_rejects_overflow() {
        assert_eq!(megabytes_to_bytes(10, "MAX_FILE_SIZE_MB").unwrap(), 10 * 1024 * 1024);

        let err = megabytes_to_bytes(u64::MAX, "MAX_FILE_SIZE_MB").unwrap_err();
        assert!(err.to_string().contains("MAX_FILE_SIZE_MB"));
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut config = local_config();
        config.base.jwt_secret = "short".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let mut config = local_config();
        config.persistence_backend = PersistenceBackend::Postgres;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        config.database_url = Some("postgresql://localhost/sharebox".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_s3_requires_bucket_and_region() {
        let mut config = local_config();
        config.storage_backend = StorageBackend::S3;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("S3_BUCKET"));

        config.s3_bucket = Some("shares".to_string());
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("S3_REGION"));

        config.aws_region = Some("eu-west-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_email_notifications_require_smtp() {
        let mut config = local_config();
        config.email_notifications_enabled = true;
        assert!(config.validate().is_err());

        config.smtp_host = Some("smtp.example.com".to_string());
        config.smtp_from = Some("noreply@example.com".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_share_link_trims_trailing_slash() {
        let config = Config(Box::new(local_config()));
        let id = uuid::Uuid::nil();
        assert_eq!(
            config.share_link(id),
            format!("https://share.example.com/files/{}", id)
        );
    }

    #[test]
    fn test_persistence_backend_parse() {
        assert_eq!(
            "Memory".parse::<PersistenceBackend>().unwrap(),
            PersistenceBackend::Memory
        );
        assert_eq!(
            "postgres".parse::<PersistenceBackend>().unwrap(),
            PersistenceBackend::Postgres
        );
        assert!("redis".parse::<PersistenceBackend>().is_err());
    }
}
