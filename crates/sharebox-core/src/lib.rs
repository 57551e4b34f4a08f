//! Sharebox Core Library
//!
//! This crate provides the domain models, error types, configuration, upload
//! submission validation and session access rules shared by every Sharebox
//! component.

pub mod access;
pub mod config;
pub mod constants;
pub mod error;
pub mod hooks;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use access::{authorize, AccessDecision, AccessDenied, DenyReason, ViewerState};
pub use config::{BaseConfig, Config, PersistenceBackend, SharingConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{DisabledShareNotifier, ShareNotifier};
pub use storage_types::StorageBackend;
pub use validation::{SubmissionError, UploadValidator};
