use crate::auth::Requester;
use crate::constants::API_PREFIX;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::SharingService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use sharebox_core::models::SessionResponse;
use sharebox_core::ViewerState;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Viewer-flow outcome for the current requester
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionAccessResponse {
    pub session_id: Uuid,
    pub state: ViewerState,
    pub granted: bool,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/v0/sessions/{id}",
    tag = "sessions",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session and its files", body = SessionResponse),
        (status = 401, description = "Session is locked and no identity was presented", body = ErrorResponse),
        (status = 403, description = "Identity is not on the allow-list", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, requester),
    fields(session_id = %id, anonymous = requester.is_anonymous(), operation = "get_session")
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, HttpAppError> {
    let session = SharingService::new(&state)
        .load_authorized(id, &requester)
        .await?;

    Ok(Json(
        SessionResponse::from(&session).with_download_urls(API_PREFIX),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v0/sessions/{id}/access",
    tag = "sessions",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Viewer state for the requester", body = SessionAccessResponse),
        (status = 500, description = "Persistence failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, requester),
    fields(session_id = %id, anonymous = requester.is_anonymous(), operation = "check_session_access")
)]
pub async fn get_session_access(
    State(state): State<Arc<AppState>>,
    requester: Requester,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionAccessResponse>, HttpAppError> {
    let viewer = SharingService::new(&state)
        .viewer_state(id, &requester)
        .await?;

    Ok(Json(SessionAccessResponse {
        session_id: id,
        state: viewer,
        granted: viewer.grants_access(),
        message: viewer.message().to_string(),
    }))
}
