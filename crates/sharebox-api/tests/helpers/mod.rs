//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p sharebox-api --test sessions_test`.
//! Sessions live in memory and files in a temporary directory, so no external
//! services are needed.

pub mod doubles;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use sharebox_api::constants;
use sharebox_api::setup::routes;
use sharebox_api::state::AppState;
use sharebox_core::{
    BaseConfig, Config, PersistenceBackend, ShareNotifier, SharingConfig, StorageBackend,
};
use sharebox_db::{InMemorySessionRepository, SessionRepository};
use sharebox_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

use doubles::RecordingNotifier;

pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long";
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, state and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn sessions(&self) -> &Arc<dyn SessionRepository> {
        &self.state.sharing.sessions
    }

    pub fn storage_root(&self) -> &std::path::Path {
        self._temp_dir.path()
    }

    /// Bearer token for a signed-in user.
    pub fn token_for(&self, user_id: &str, email: Option<&str>) -> String {
        self.state
            .auth
            .jwt
            .issue_token(user_id, email, chrono::Duration::hours(1))
            .expect("Failed to issue test token")
    }

    pub fn bearer(&self, user_id: &str, email: Option<&str>) -> String {
        format!("Bearer {}", self.token_for(user_id, email))
    }
}

pub fn create_test_config(storage_path: &str) -> Config {
    Config(Box::new(SharingConfig {
        base: BaseConfig {
            server_port: 3000,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 5,
            db_timeout_seconds: 30,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
        },
        persistence_backend: PersistenceBackend::Memory,
        database_url: None,
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: Some(storage_path.to_string()),
        local_storage_base_url: Some("http://localhost:3000/files".to_string()),
        presigned_url_ttl_secs: 900,
        max_file_size_bytes: MAX_FILE_SIZE_BYTES,
        max_files_per_session: 100,
        public_base_url: "http://localhost:3000".to_string(),
        email_notifications_enabled: false,
        smtp_host: None,
        smtp_port: None,
        smtp_user: None,
        smtp_password: None,
        smtp_from: None,
        smtp_tls: false,
    }))
}

/// Setup test app with in-memory sessions, local storage and a recording notifier.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(RecordingNotifier::default()),
    )
    .await
}

/// Setup test app with the given collaborators.
pub async fn setup_test_app_with(
    sessions: Arc<dyn SessionRepository>,
    notifier: Arc<dyn ShareNotifier>,
) -> TestApp {
    setup_test_app_with_storage(sessions, notifier, |local| -> Arc<dyn Storage> {
        Arc::new(local)
    })
    .await
}

/// Local storage rooted at `root`, as every test app uses.
pub async fn local_storage(root: &std::path::Path) -> LocalStorage {
    LocalStorage::new(root.to_path_buf(), "http://localhost:3000/files".to_string())
        .await
        .expect("Failed to create local storage")
}

/// Setup test app whose storage is built around the temp-dir local storage.
pub async fn setup_test_app_with_storage(
    sessions: Arc<dyn SessionRepository>,
    notifier: Arc<dyn ShareNotifier>,
    wrap_storage: impl FnOnce(LocalStorage) -> Arc<dyn Storage>,
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().to_path_buf();
    let storage = wrap_storage(local_storage(&storage_path).await);

    let config = create_test_config(&storage_path.to_string_lossy());
    let state = Arc::new(AppState::new(config.clone(), sessions, storage, notifier));

    let app = routes::setup_routes(&config, state.clone()).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// A `file` part with the given name, MIME type and content.
pub fn file_part(name: &str, content_type: &str, data: Vec<u8>) -> Part {
    Part::bytes(data).file_name(name).mime_type(content_type)
}

/// Share form with LINK delivery and the given files.
pub fn link_form(files: Vec<Part>) -> MultipartForm {
    files
        .into_iter()
        .fold(MultipartForm::new().add_text("method", "LINK"), |form, part| {
            form.add_part("file", part)
        })
}

/// Count blobs written below the storage root.
pub fn stored_file_count(root: &std::path::Path) -> usize {
    fn walk(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|entry| {
                        let path = entry.path();
                        if path.is_dir() {
                            walk(&path)
                        } else {
                            1
                        }
                    })
                    .sum()
            })
            .unwrap_or(0)
    }
    walk(root)
}
