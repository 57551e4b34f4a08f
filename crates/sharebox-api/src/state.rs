//! Application state.
//!
//! AppState is split into sub-states so middleware can be handed only what it
//! needs.

use sharebox_core::{Config, ShareNotifier, UploadValidator};
use sharebox_db::SessionRepository;
use sharebox_storage::Storage;
use std::sync::Arc;

use crate::auth::JwtService;

/// Identity verification, used by the auth middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<JwtService>,
}

/// Collaborators of the sharing flow
#[derive(Clone)]
pub struct SharingState {
    pub sessions: Arc<dyn SessionRepository>,
    pub storage: Arc<dyn Storage>,
    pub notifier: Arc<dyn ShareNotifier>,
    pub validator: UploadValidator,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: AuthState,
    pub sharing: SharingState,
}

impl AppState {
    pub fn new(
        config: Config,
        sessions: Arc<dyn SessionRepository>,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn ShareNotifier>,
    ) -> Self {
        let validator = UploadValidator::new(config.max_file_size_bytes());
        let jwt = Arc::new(JwtService::new(config.jwt_secret()));
        Self {
            config,
            auth: AuthState { jwt },
            sharing: SharingState {
                sessions,
                storage,
                notifier,
                validator,
            },
        }
    }
}
