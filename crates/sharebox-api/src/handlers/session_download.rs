use crate::auth::Requester;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::SharingService;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Response, StatusCode},
    response::{IntoResponse, Redirect},
};
use futures::StreamExt;
use serde::Deserialize;
use sharebox_core::{AppError, StorageBackend};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    /// Redirect to a pre-signed URL instead of proxying the bytes
    #[serde(default)]
    pub redirect: bool,
}

#[utoipa::path(
    get,
    path = "/api/v0/sessions/{id}/files/{file_id}",
    tag = "sessions",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("file_id" = Uuid, Path, description = "File ID"),
        ("redirect" = Option<bool>, Query, description = "Redirect to a pre-signed storage URL (S3 only)")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 307, description = "Redirect to a pre-signed URL"),
        (status = 401, description = "Session is locked and no identity was presented", body = ErrorResponse),
        (status = 403, description = "Identity is not on the allow-list", body = ErrorResponse),
        (status = 404, description = "Session or file not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, requester, query),
    fields(session_id = %id, file_id = %file_id, operation = "download_session_file")
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    requester: Requester,
    Path((id, file_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = SharingService::new(&state)
        .load_authorized_file(id, file_id, &requester)
        .await?;
    let storage = &state.sharing.storage;

    if query.redirect && storage.backend_type() == StorageBackend::S3 {
        let ttl = Duration::from_secs(state.config.presigned_url_ttl_secs());
        let url = storage.get_presigned_url(&file.storage_key, ttl).await?;
        tracing::debug!(storage_key = %file.storage_key, "Redirecting to pre-signed URL");
        return Ok(Redirect::temporary(&url).into_response());
    }

    tracing::debug!(storage_key = %file.storage_key, "Proxying file from storage");

    let stream = storage.download_stream(&file.storage_key).await?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let content_disposition = content_disposition(&file.name);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type.as_str())
        .header(header::CONTENT_LENGTH, file.size)
        .header(header::CONTENT_DISPOSITION, content_disposition)
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// `attachment` header value for a stored filename.
///
/// The quoted `filename` keeps printable ASCII only. The exact name travels in
/// `filename*` whenever the two differ.
fn content_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    if fallback == name {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(name)
        )
    }
}
