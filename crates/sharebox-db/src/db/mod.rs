//! Database repositories for data access layer
//!
//! [`SessionRepository`] is the persistence seam. The Postgres implementation
//! is used in production; the in-memory one backs tests and single-process
//! deployments.

pub mod error;
pub mod memory;
pub mod session;
pub mod transaction;

pub use error::{RepositoryError, RepositoryResult};
pub use memory::InMemorySessionRepository;
pub use session::{PostgresSessionRepository, SessionRepository};
