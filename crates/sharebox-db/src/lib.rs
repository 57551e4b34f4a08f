//! Sharebox persistence
//!
//! File sessions are recorded together with their files and allow-list in a
//! single step, then only ever read back.

pub mod db;

pub use db::{
    InMemorySessionRepository, PostgresSessionRepository, RepositoryError, RepositoryResult,
    SessionRepository,
};
