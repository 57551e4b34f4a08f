//! OpenAPI documentation.
//! Paths in handler annotations are literals under `crate::constants::API_PREFIX`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use sharebox_core::models;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sharebox API",
        version = "0.1.0",
        description = "File sharing API (v0). Owners upload a batch of files as a session, share it by link or email and may lock it to an email address. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::session_upload::create_session,
        handlers::session_get::get_session,
        handlers::session_get::get_session_access,
        handlers::session_download::download_file,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::SessionResponse,
            models::SessionFileItem,
            models::DistributionMethod,
            models::FileKind,
            sharebox_core::ViewerState,
            handlers::session_get::SessionAccessResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "sessions", description = "Share sessions: upload, view, access checks and downloads")
    )
)]
pub struct ApiDoc;
