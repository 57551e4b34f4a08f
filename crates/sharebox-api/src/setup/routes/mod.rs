//! Route configuration and setup.
//!
//! Session routes live under the versioned API prefix; health checks in [health](health).

mod health;

use crate::auth::middleware::identity_middleware;
use crate::constants::{API_PREFIX, OPENAPI_JSON_PATH};
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use sharebox_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and the text fields of a share form
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let session_routes = session_routes().layer(axum::middleware::from_fn_with_state(
        state.auth.clone(),
        identity_middleware,
    ));

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let body_limit = request_body_limit(config);
    tracing::info!(body_limit_bytes = body_limit, "Request body limit enabled");

    let app = public_routes()
        .merge(session_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new(OPENAPI_JSON_PATH)
                .path("/docs")
                .into(),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// Largest share form the server will read: every file at the size limit.
fn request_body_limit(config: &Config) -> usize {
    let per_file = usize::try_from(config.max_file_size_bytes()).unwrap_or(usize::MAX);
    per_file
        .saturating_mul(config.max_files_per_session())
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::liveness_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .route(
            OPENAPI_JSON_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/sessions", API_PREFIX),
            post(handlers::session_upload::create_session),
        )
        .route(
            &format!("{}/sessions/{{id}}", API_PREFIX),
            get(handlers::session_get::get_session),
        )
        .route(
            &format!("{}/sessions/{{id}}/access", API_PREFIX),
            get(handlers::session_get::get_session_access),
        )
        .route(
            &format!("{}/sessions/{{id}}/files/{{file_id}}", API_PREFIX),
            get(handlers::session_download::download_file),
        )
}
