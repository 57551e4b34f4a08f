//! Collaborator doubles for failure-path tests.

use async_trait::async_trait;
use bytes::Bytes;
use sharebox_core::models::{AllowListEntry, FileSession, NewFileSession};
use sharebox_core::{ShareNotifier, StorageBackend};
use sharebox_db::{RepositoryError, RepositoryResult, SessionRepository};
use sharebox_storage::{ByteStream, LocalStorage, Storage, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// Remembers every notification it was asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("notifier lock").clone()
    }
}

#[async_trait]
impl ShareNotifier for RecordingNotifier {
    async fn notify_recipient(&self, to: &str, session_link: &str) -> Result<(), String> {
        self.sent
            .lock()
            .expect("notifier lock")
            .push((to.to_string(), session_link.to_string()));
        Ok(())
    }
}

/// SMTP relay that is always down.
pub struct FailingNotifier;

#[async_trait]
impl ShareNotifier for FailingNotifier {
    async fn notify_recipient(&self, _to: &str, _session_link: &str) -> Result<(), String> {
        Err("connection refused".to_string())
    }
}

/// Persistence that refuses every write.
pub struct FailingSessionRepository;

#[async_trait]
impl SessionRepository for FailingSessionRepository {
    async fn create_session(&self, _session: NewFileSession) -> RepositoryResult<FileSession> {
        Err(RepositoryError::Transaction(anyhow::anyhow!(
            "database unavailable"
        )))
    }

    async fn get_session(&self, _session_id: Uuid) -> RepositoryResult<Option<FileSession>> {
        Ok(None)
    }

    async fn list_allow_list(&self, _session_id: Uuid) -> RepositoryResult<Vec<AllowListEntry>> {
        Ok(Vec::new())
    }
}

/// Local storage whose uploads start failing after `succeed_first` writes.
pub struct FlakyStorage {
    inner: LocalStorage,
    succeed_first: usize,
    uploads: AtomicUsize,
}

impl FlakyStorage {
    pub fn new(inner: LocalStorage, succeed_first: usize) -> Self {
        Self {
            inner,
            succeed_first,
            uploads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Storage for FlakyStorage {
    async fn upload(
        &self,
        session_id: Uuid,
        file_id: Uuid,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<(String, String)> {
        if self.uploads.fetch_add(1, Ordering::SeqCst) >= self.succeed_first {
            return Err(StorageError::UploadFailed("disk full".to_string()));
        }
        self.inner
            .upload(session_id, file_id, filename, content_type, data)
            .await
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.inner.download(storage_key).await
    }

    async fn download_stream(&self, storage_key: &str) -> StorageResult<ByteStream> {
        self.inner.download_stream(storage_key).await
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.inner.delete(storage_key).await
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.inner.get_presigned_url(storage_key, expires_in).await
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.inner.exists(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
