use uuid::Uuid;

/// Persistence failures
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session {0} already exists")]
    DuplicateSession(Uuid),

    #[error("Transaction error: {0}")]
    Transaction(#[from] anyhow::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
