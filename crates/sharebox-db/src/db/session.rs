use async_trait::async_trait;
use chrono::Utc;
use sharebox_core::models::{AllowListEntry, FileSession, FileSessionRow, NewFileSession, SessionFile};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryResult};
use super::transaction::TransactionGuard;

/// Persistence seam for file sessions
///
/// Sessions are created once, with every file and allow-list entry, and are
/// never modified afterwards.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Record a session, its files and its allow-list atomically
    async fn create_session(&self, session: NewFileSession) -> RepositoryResult<FileSession>;

    async fn get_session(&self, session_id: Uuid) -> RepositoryResult<Option<FileSession>>;

    async fn list_allow_list(&self, session_id: Uuid) -> RepositoryResult<Vec<AllowListEntry>>;
}

#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_insert_error(session_id: Uuid, err: sqlx::Error) -> RepositoryError {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::DuplicateSession(session_id)
            }
            _ => RepositoryError::Database(err),
        }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    #[tracing::instrument(
        skip(self, session),
        fields(
            db.table = "file_sessions",
            db.operation = "insert",
            session_id = %session.id,
            file_count = session.files.len()
        )
    )]
    async fn create_session(&self, session: NewFileSession) -> RepositoryResult<FileSession> {
        let session_id = session.id;
        let created_at = Utc::now();

        let mut tx = TransactionGuard::begin(&self.pool, "create_session").await?;

        sqlx::query(
            "INSERT INTO file_sessions (id, owner_id, method, is_locked, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(session_id)
        .bind(&session.owner_id)
        .bind(session.method)
        .bind(session.is_locked)
        .bind(created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| Self::map_insert_error(session_id, e))?;

        for (position, file) in session.files.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO session_files
                    (id, session_id, position, name, size, content_type, url, storage_key, metadata)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(file.id)
            .bind(session_id)
            .bind(position as i32)
            .bind(&file.name)
            .bind(file.size)
            .bind(&file.content_type)
            .bind(&file.url)
            .bind(&file.storage_key)
            .bind(&file.metadata)
            .execute(&mut **tx)
            .await?;
        }

        for email in &session.allow_list {
            sqlx::query("INSERT INTO session_allow_list (session_id, email) VALUES ($1, $2)")
                .bind(session_id)
                .bind(email)
                .execute(&mut **tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            session_id = %session_id,
            is_locked = session.is_locked,
            "File session created"
        );

        Ok(session.into_session(created_at))
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_sessions", db.operation = "select", db.record_id = %session_id))]
    async fn get_session(&self, session_id: Uuid) -> RepositoryResult<Option<FileSession>> {
        let row = sqlx::query_as::<Postgres, FileSessionRow>(
            "SELECT id, owner_id, method, is_locked, created_at FROM file_sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let files = sqlx::query_as::<Postgres, SessionFile>(
            r#"
            SELECT id, session_id, name, size, content_type, url, storage_key, metadata
            FROM session_files
            WHERE session_id = $1
            ORDER BY position
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        let allow_list = self.list_allow_list(session_id).await?;

        Ok(Some(FileSession::from_parts(row, files, allow_list)))
    }

    #[tracing::instrument(skip(self), fields(db.table = "session_allow_list", db.operation = "select", db.record_id = %session_id))]
    async fn list_allow_list(&self, session_id: Uuid) -> RepositoryResult<Vec<AllowListEntry>> {
        let entries = sqlx::query_as::<Postgres, AllowListEntry>(
            "SELECT session_id, email FROM session_allow_list WHERE session_id = $1 ORDER BY email",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
