//! Share form parsing
//!
//! The upload form posts every picked file under the `file` field plus the
//! delivery settings `method`, `email`, `isLocked` and `lockToUser`.

use axum::extract::Multipart;
use bytes::Bytes;
use sharebox_core::models::{CandidateFile, DistributionMethod, UploadSubmission};
use sharebox_core::AppError;

const FIELD_FILE: &str = "file";
const FIELD_METHOD: &str = "method";
const FIELD_EMAIL: &str = "email";
const FIELD_IS_LOCKED: &str = "isLocked";
const FIELD_LOCK_TO_USER: &str = "lockToUser";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One `file` part, fully buffered
#[derive(Debug, Clone)]
pub struct FormFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// The share form as posted, before any rule is applied
#[derive(Debug, Clone)]
pub struct ShareForm {
    pub files: Vec<FormFile>,
    pub method: DistributionMethod,
    pub email: Option<String>,
    pub is_locked: bool,
    pub lock_to_user: Option<String>,
}

impl ShareForm {
    /// Describe the form to the validator. File bytes stay here.
    pub fn to_submission(&self) -> UploadSubmission {
        UploadSubmission {
            files: self
                .files
                .iter()
                .map(|f| CandidateFile::new(f.name.clone(), f.data.len() as u64, f.content_type.clone()))
                .collect(),
            method: self.method,
            email: self.email.clone(),
            is_locked: self.is_locked,
            lock_to_email: self.lock_to_user.clone(),
        }
    }
}

/// Read the share form from a multipart body.
///
/// At most `max_files` file parts are accepted. Unknown fields are ignored.
/// Empty text fields count as absent.
pub async fn extract_share_form(
    mut multipart: Multipart,
    max_files: usize,
) -> Result<ShareForm, AppError> {
    let mut files = Vec::new();
    let mut method: Option<DistributionMethod> = None;
    let mut email: Option<String> = None;
    let mut is_locked = false;
    let mut lock_to_user: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            FIELD_FILE => {
                if files.len() >= max_files {
                    return Err(AppError::BadRequest(format!(
                        "At most {} files can be shared at once",
                        max_files
                    )));
                }
                let name = display_name(field.file_name());
                let content_type = field
                    .content_type()
                    .map(|s: &str| s.to_string())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                files.push(FormFile {
                    name,
                    content_type,
                    data,
                });
            }
            FIELD_METHOD => {
                let value = read_text(field).await?;
                method = match value {
                    Some(v) => Some(v.parse().map_err(|_| {
                        AppError::BadRequest(format!("Unknown distribution method: {}", v))
                    })?),
                    None => None,
                };
            }
            FIELD_EMAIL => email = read_text(field).await?,
            FIELD_IS_LOCKED => is_locked = read_text(field).await?.is_some_and(|v| parse_flag(&v)),
            FIELD_LOCK_TO_USER => lock_to_user = read_text(field).await?,
            other => {
                tracing::debug!(field = %other, "Ignoring unknown form field");
            }
        }
    }

    Ok(ShareForm {
        files,
        method: method.unwrap_or(DistributionMethod::Link),
        email,
        is_locked,
        lock_to_user,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<Option<String>, AppError> {
    let text = field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {}", e)))?;
    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Checkbox-style flags: "true", "on", "1" and "yes" are set, anything else is not.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

/// Name shown to viewers: the client's filename without any directory part.
pub fn display_name(filename: Option<&str>) -> String {
    filename
        .map(|name| name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name).trim())
        .filter(|name| !name.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
