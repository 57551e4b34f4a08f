//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or types that implement `Into<AppError>`) for errors and `?` so they become
//! `HttpAppError` and render consistently (status, body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sharebox_core::{AccessDenied, AppError, ErrorMetadata, LogLevel, SubmissionError};
use sharebox_db::RepositoryError;
use sharebox_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Sign in with a different email address")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    /// Create a simple error response with default values
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            error_type: None,
            code: code.into(),
            recoverable: false,
            suggested_action: None,
        }
    }

    fn from_app_error(app_error: &AppError, with_details: bool) -> Self {
        Self {
            error: app_error.client_message(),
            details: with_details.then(|| app_error.detailed_message()),
            error_type: with_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from sharebox-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<SubmissionError> for HttpAppError {
    fn from(err: SubmissionError) -> Self {
        HttpAppError(AppError::Submission(err))
    }
}

impl From<AccessDenied> for HttpAppError {
    fn from(err: AccessDenied) -> Self {
        HttpAppError(AppError::AccessDenied(err))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details are hidden in production and for sensitive errors.
        let with_details = !is_production_env() && !app_error.is_sensitive();
        let body = Json(ErrorResponse::from_app_error(app_error, with_details));

        (status, body).into_response()
    }
}

// Collaborator errors, converted at the HTTP boundary

pub fn storage_error_to_app(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(msg) => AppError::NotFound(msg),
        StorageError::UploadFailed(msg)
        | StorageError::DownloadFailed(msg)
        | StorageError::DeleteFailed(msg)
        | StorageError::BackendError(msg)
        | StorageError::InvalidKey(msg)
        | StorageError::ConfigError(msg) => AppError::Storage(msg),
        StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
    }
}

pub fn repository_error_to_app(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::Database(e) => AppError::Database(e),
        RepositoryError::DuplicateSession(id) => {
            AppError::Internal(format!("Session {} already exists", id))
        }
        RepositoryError::Transaction(e) => AppError::InternalWithSource {
            message: "Transaction failed".to_string(),
            source: e,
        },
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error_to_app(err))
    }
}

impl From<RepositoryError> for HttpAppError {
    fn from(err: RepositoryError) -> Self {
        HttpAppError(repository_error_to_app(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharebox_core::DenyReason;
    use uuid::Uuid;

    #[test]
    fn test_from_storage_error_not_found() {
        let storage_err = StorageError::NotFound("File not found".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "File not found"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_upload_failed_is_storage_class() {
        let storage_err = StorageError::UploadFailed("Upload failed".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert_eq!(app_err.error_code(), "STORAGE_ERROR");
        assert_eq!(app_err.http_status_code(), 500);
    }

    #[test]
    fn test_from_storage_error_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let HttpAppError(app_err) = StorageError::IoError(io_err).into();
        match app_err {
            AppError::Storage(msg) => assert!(msg.contains("IO error")),
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_from_repository_error_is_persistence_class() {
        let HttpAppError(app_err) = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(app_err.error_code(), "DATABASE_ERROR");
        assert!(app_err.is_sensitive());
    }

    #[test]
    fn test_duplicate_session_is_internal() {
        let HttpAppError(app_err) = RepositoryError::DuplicateSession(Uuid::new_v4()).into();
        assert_eq!(app_err.http_status_code(), 500);
    }

    #[test]
    fn test_submission_and_access_errors_keep_their_status() {
        let HttpAppError(app_err) = SubmissionError::InvalidEmail.into();
        assert_eq!(app_err.http_status_code(), 400);
        assert_eq!(app_err.client_message(), "Please enter a valid email address");

        let HttpAppError(app_err) = AccessDenied(DenyReason::AuthenticationRequired).into();
        assert_eq!(app_err.http_status_code(), 401);

        let HttpAppError(app_err) = AccessDenied(DenyReason::NotAuthorized).into();
        assert_eq!(app_err.http_status_code(), 403);
    }

    #[test]
    fn test_sensitive_error_response_has_no_details() {
        let response =
            ErrorResponse::from_app_error(&AppError::Storage("bucket gone".to_string()), false);
        let json = serde_json::to_value(&response).expect("serialize");
        assert!(json.get("details").is_none());
        assert_eq!(json["code"], "STORAGE_ERROR");
    }

    /// Verifies the public error response contract: serialized ErrorResponse has "error",
    /// "code", "recoverable", and optionally "details" / "error_type" / "suggested_action".
    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse {
            error: "Session not found".to_string(),
            details: Some("Session not found: 00000000-0000-0000-0000-000000000000".to_string()),
            error_type: Some("SessionNotFound".to_string()),
            code: "SESSION_NOT_FOUND".to_string(),
            recoverable: false,
            suggested_action: None,
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert!(json.get("error").and_then(|v| v.as_str()).is_some());
        assert!(json.get("recoverable").and_then(|v| v.as_bool()).is_some());
        assert_eq!(
            json.get("code").and_then(|v| v.as_str()),
            Some("SESSION_NOT_FOUND")
        );
        assert!(json.get("suggested_action").is_none());
    }
}
