use crate::auth::AuthenticatedUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::SharingService;
use crate::state::AppState;
use crate::utils::upload::extract_share_form;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use sharebox_core::models::UploadResponse;
use std::sync::Arc;

/// Share a batch of files
///
/// Multipart fields: `file` (repeated), `method` (`LINK` or `EMAIL`), `email`,
/// `isLocked` and `lockToUser`. Requires a bearer token; the token's subject
/// becomes the session owner.
#[utoipa::path(
    post,
    path = "/api/v0/sessions",
    tag = "sessions",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Session created", body = UploadResponse),
        (status = 400, description = "No files selected, invalid email or invalid form", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 413, description = "A file exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Storage or persistence failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(owner_id = %owner.user_id, operation = "create_session")
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    owner: AuthenticatedUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), HttpAppError> {
    let form = extract_share_form(multipart, state.config.max_files_per_session()).await?;

    let response = SharingService::new(&state).share(&owner, form).await?;

    Ok((StatusCode::CREATED, Json(response)))
}
