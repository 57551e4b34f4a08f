//! Sharebox Storage Library
//!
//! This crate provides the blob storage abstraction for shared files and its
//! implementations for S3 (via `object_store`) and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are session-scoped. All backends use the same layout:
//!
//! - `sessions/{session_id}/{file_id}-{sanitized_filename}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use sharebox_core::StorageBackend;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
