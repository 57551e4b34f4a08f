use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::session::{DistributionMethod, NewFileSession, NewSessionFile};

/// A file offered for upload, described by what the client declared
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CandidateFile {
    /// Original filename
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Declared MIME type
    pub content_type: String,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, size: u64, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            content_type: content_type.into(),
        }
    }
}

/// A share submission, parsed from the upload form before any rule is applied
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSubmission {
    pub files: Vec<CandidateFile>,
    pub method: DistributionMethod,
    /// Recipient address, required for `EMAIL`
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_locked: bool,
    /// Address the session is locked to, required when `is_locked`
    #[serde(default)]
    pub lock_to_email: Option<String>,
}

impl UploadSubmission {
    /// Field rules declared on each candidate (filename length).
    pub fn validate_files(&self) -> Result<(), ValidationErrors> {
        self.files.iter().try_for_each(Validate::validate)
    }
}

/// A validated file in a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFile {
    pub name: String,
    pub size: u64,
    pub content_type: String,
}

/// Outcome of a successful validation: the only input used to build a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDraft {
    pub files: Vec<DraftFile>,
    pub method: DistributionMethod,
    pub recipient_email: Option<String>,
    pub is_locked: bool,
    pub allow_list: Vec<String>,
}

impl SessionDraft {
    /// Combine the draft with the owner and the stored file locators.
    ///
    /// `stored` must be in the same order as `files`.
    pub fn into_new_session(
        self,
        session_id: Uuid,
        owner_id: impl Into<String>,
        stored: Vec<NewSessionFile>,
    ) -> NewFileSession {
        NewFileSession {
            id: session_id,
            owner_id: owner_id.into(),
            method: self.method,
            is_locked: self.is_locked,
            files: stored,
            allow_list: self.allow_list,
        }
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Response after a share submission
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_url: Option<String>,
    /// Set when the session was created but the recipient could not be notified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
