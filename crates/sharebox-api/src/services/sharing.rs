//! Share submission and session access
//!
//! Submissions run validate → store → persist → notify. The session row, its
//! files and its allow-list are recorded in a single repository call; if that
//! call fails, the blobs already written are removed again.

use std::sync::Arc;

use sharebox_core::models::{
    DistributionMethod, FileSession, NewSessionFile, SessionDraft, SessionFile, UploadResponse,
};
use sharebox_core::{authorize, AppError, ViewerState};
use uuid::Uuid;

use crate::auth::{AuthenticatedUser, Requester};
use crate::error::{repository_error_to_app, storage_error_to_app};
use crate::state::AppState;
use crate::utils::upload::{FormFile, ShareForm};

pub struct SharingService {
    state: Arc<AppState>,
}

impl SharingService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Create a session from a share form on behalf of `owner`.
    ///
    /// Nothing is stored when validation fails. A failed notification does not
    /// fail the share; it is reported through `warning`.
    pub async fn share(
        &self,
        owner: &AuthenticatedUser,
        form: ShareForm,
    ) -> Result<UploadResponse, AppError> {
        let submission = form.to_submission();
        let draft = self.state.sharing.validator.validate(&submission)?;
        submission.validate_files()?;

        let session_id = Uuid::new_v4();
        tracing::info!(
            session_id = %session_id,
            owner_id = %owner.user_id,
            file_count = draft.files.len(),
            total_bytes = draft.total_size(),
            method = %draft.method,
            is_locked = draft.is_locked,
            "Share submission accepted"
        );

        let stored = self.store_files(session_id, form.files).await?;
        let session = self.record_session(session_id, owner, draft.clone(), stored).await?;

        let session_url = self.state.config.share_link(session.id);
        let (message, warning) = self.notify(&draft, &session_url).await;

        Ok(UploadResponse {
            success: true,
            message,
            session_id: Some(session.id),
            session_url: Some(session_url),
            warning,
        })
    }

    async fn store_files(
        &self,
        session_id: Uuid,
        files: Vec<FormFile>,
    ) -> Result<Vec<NewSessionFile>, AppError> {
        let storage = &self.state.sharing.storage;
        let mut stored: Vec<NewSessionFile> = Vec::with_capacity(files.len());

        for file in files {
            let file_id = Uuid::new_v4();
            let size = file.data.len() as i64;
            match storage
                .upload(session_id, file_id, &file.name, &file.content_type, file.data)
                .await
            {
                Ok((storage_key, url)) => stored.push(NewSessionFile {
                    id: file_id,
                    name: file.name,
                    size,
                    content_type: file.content_type,
                    url,
                    storage_key,
                    metadata: None,
                }),
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        session_id = %session_id,
                        filename = %file.name,
                        "Failed to store shared file"
                    );
                    self.remove_blobs(&stored).await;
                    return Err(storage_error_to_app(e));
                }
            }
        }

        Ok(stored)
    }

    async fn record_session(
        &self,
        session_id: Uuid,
        owner: &AuthenticatedUser,
        draft: SessionDraft,
        stored: Vec<NewSessionFile>,
    ) -> Result<FileSession, AppError> {
        let new_session = draft.into_new_session(session_id, owner.user_id.clone(), stored.clone());

        match self.state.sharing.sessions.create_session(new_session).await {
            Ok(session) => Ok(session),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    session_id = %session_id,
                    "Failed to record session, removing stored files"
                );
                self.remove_blobs(&stored).await;
                Err(repository_error_to_app(e))
            }
        }
    }

    /// Best-effort removal of blobs that will never be referenced.
    async fn remove_blobs(&self, files: &[NewSessionFile]) {
        for file in files {
            if let Err(cleanup_err) = self.state.sharing.storage.delete(&file.storage_key).await {
                tracing::debug!(
                    error = %cleanup_err,
                    storage_key = %file.storage_key,
                    "Failed to cleanup storage file"
                );
            }
        }
    }

    async fn notify(&self, draft: &SessionDraft, session_url: &str) -> (String, Option<String>) {
        let recipient = match (draft.method, draft.recipient_email.as_deref()) {
            (DistributionMethod::Email, Some(recipient)) => recipient,
            _ => {
                return (
                    "Files uploaded successfully! Link has been created.".to_string(),
                    None,
                )
            }
        };

        match self
            .state
            .sharing
            .notifier
            .notify_recipient(recipient, session_url)
            .await
        {
            Ok(()) => (
                format!("Files uploaded successfully! Email sent to {}.", recipient),
                None,
            ),
            Err(e) => {
                tracing::warn!(error = %e, recipient = %recipient, "Share notification failed");
                (
                    "Files uploaded successfully! Link has been created.".to_string(),
                    Some(format!(
                        "The email to {} could not be sent. Share the link instead.",
                        recipient
                    )),
                )
            }
        }
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Option<FileSession>, AppError> {
        self.state
            .sharing
            .sessions
            .get_session(session_id)
            .await
            .map_err(repository_error_to_app)
    }

    /// Load a session the requester is allowed to see.
    pub async fn load_authorized(
        &self,
        session_id: Uuid,
        requester: &Requester,
    ) -> Result<FileSession, AppError> {
        let session = self
            .find_session(session_id)
            .await?
            .ok_or(AppError::SessionNotFound(session_id))?;

        authorize(&session, requester.email()).into_result()?;
        Ok(session)
    }

    /// Load one file of a session the requester is allowed to see.
    pub async fn load_authorized_file(
        &self,
        session_id: Uuid,
        file_id: Uuid,
        requester: &Requester,
    ) -> Result<SessionFile, AppError> {
        let session = self.load_authorized(session_id, requester).await?;
        session
            .file(file_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("File {} not found in session", file_id)))
    }

    /// Where the viewer flow ends up for this requester.
    pub async fn viewer_state(
        &self,
        session_id: Uuid,
        requester: &Requester,
    ) -> Result<ViewerState, AppError> {
        let session = self.find_session(session_id).await?;
        Ok(ViewerState::evaluate(session.as_ref(), requester.email()))
    }
}
