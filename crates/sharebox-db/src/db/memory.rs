use async_trait::async_trait;
use chrono::Utc;
use sharebox_core::models::{AllowListEntry, FileSession, NewFileSession};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryResult};
use super::session::SessionRepository;

/// Process-local session store
///
/// A session is built completely before it is inserted under the write lock,
/// so readers see either the whole session or nothing.
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, FileSession>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create_session(&self, session: NewFileSession) -> RepositoryResult<FileSession> {
        let session_id = session.id;
        let created = session.into_session(Utc::now());

        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session_id) {
            return Err(RepositoryError::DuplicateSession(session_id));
        }
        sessions.insert(session_id, created.clone());

        tracing::debug!(session_id = %session_id, "File session stored in memory");
        Ok(created)
    }

    async fn get_session(&self, session_id: Uuid) -> RepositoryResult<Option<FileSession>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn list_allow_list(&self, session_id: Uuid) -> RepositoryResult<Vec<AllowListEntry>> {
        Ok(self
            .sessions
            .read()
            .await
            .get(&session_id)
            .map(|session| session.allow_list.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharebox_core::models::{DistributionMethod, NewSessionFile};

    fn new_session(is_locked: bool, allow_list: Vec<String>) -> NewFileSession {
        NewFileSession {
            id: Uuid::new_v4(),
            owner_id: "user123".to_string(),
            method: DistributionMethod::Link,
            is_locked,
            files: vec![
                NewSessionFile {
                    id: Uuid::new_v4(),
                    name: "a.pdf".to_string(),
                    size: 3_000_000,
                    content_type: "application/pdf".to_string(),
                    url: "http://localhost/a.pdf".to_string(),
                    storage_key: "sessions/x/a.pdf".to_string(),
                    metadata: None,
                },
                NewSessionFile {
                    id: Uuid::new_v4(),
                    name: "b.png".to_string(),
                    size: 1_000_000,
                    content_type: "image/png".to_string(),
                    url: "http://localhost/b.png".to_string(),
                    storage_key: "sessions/x/b.png".to_string(),
                    metadata: None,
                },
            ],
            allow_list,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let repo = InMemorySessionRepository::new();
        let draft = new_session(false, Vec::new());
        let id = draft.id;

        let created = repo.create_session(draft).await.unwrap();
        assert_eq!(created.files.len(), 2);
        assert!(created.files.iter().all(|f| f.session_id == id));
        assert!(created.allow_list.is_empty());

        let loaded = repo.get_session(id).await.unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.files[0].name, "a.pdf");
        assert_eq!(loaded.files[1].name, "b.png");
    }

    #[tokio::test]
    async fn test_missing_session_is_none() {
        let repo = InMemorySessionRepository::new();
        assert!(repo.get_session(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo
            .list_allow_list(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_allow_list_is_recorded_with_session() {
        let repo = InMemorySessionRepository::new();
        let draft = new_session(true, vec!["user@example.com".to_string()]);
        let id = draft.id;
        repo.create_session(draft).await.unwrap();

        let entries = repo.list_allow_list(id).await.unwrap();
        assert_eq!(
            entries,
            vec![AllowListEntry {
                session_id: id,
                email: "user@example.com".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected_without_overwrite() {
        let repo = InMemorySessionRepository::new();
        let first = new_session(false, Vec::new());
        let mut second = new_session(true, vec!["x@example.com".to_string()]);
        second.id = first.id;

        repo.create_session(first.clone()).await.unwrap();
        let err = repo.create_session(second).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateSession(id) if id == first.id));

        let stored = repo.get_session(first.id).await.unwrap().unwrap();
        assert!(!stored.is_locked);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_usable_through_trait_object() {
        let repo: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
        let draft = new_session(false, Vec::new());
        let id = draft.id;
        repo.create_session(draft).await.unwrap();
        assert!(repo.get_session(id).await.unwrap().is_some());
    }
}
