use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use super::file_kind::{format_file_size, FileKind};

/// How recipients learn about a shared session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "distribution_method", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum DistributionMethod {
    /// Shareable URL handed out by the owner
    Link,
    /// Direct notification to a recipient address
    Email,
}

impl FromStr for DistributionMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LINK" => Ok(DistributionMethod::Link),
            "EMAIL" => Ok(DistributionMethod::Email),
            _ => Err(anyhow::anyhow!("Invalid distribution method: {}", s)),
        }
    }
}

impl Display for DistributionMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DistributionMethod::Link => write!(f, "LINK"),
            DistributionMethod::Email => write!(f, "EMAIL"),
        }
    }
}

/// Session row without its children
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct FileSessionRow {
    pub id: Uuid,
    pub owner_id: String,
    pub method: DistributionMethod,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
}

/// One uploaded artifact belonging to a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct SessionFile {
    pub id: Uuid,
    pub session_id: Uuid,
    pub name: String,
    pub size: i64,
    pub content_type: String,
    pub url: String,
    pub storage_key: String,
    pub metadata: Option<JsonValue>,
}

/// One permitted viewer of a locked session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct AllowListEntry {
    pub session_id: Uuid,
    pub email: String,
}

/// An upload batch shared as a unit, with its files and allow-list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSession {
    pub id: Uuid,
    pub owner_id: String,
    pub method: DistributionMethod,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
    pub files: Vec<SessionFile>,
    pub allow_list: Vec<AllowListEntry>,
}

impl FileSession {
    pub fn from_parts(
        row: FileSessionRow,
        files: Vec<SessionFile>,
        allow_list: Vec<AllowListEntry>,
    ) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            method: row.method,
            is_locked: row.is_locked,
            created_at: row.created_at,
            files,
            allow_list,
        }
    }

    pub fn file(&self, file_id: Uuid) -> Option<&SessionFile> {
        self.files.iter().find(|f| f.id == file_id)
    }
}

/// Input to the persistence layer: everything needed to record a session in one step
#[derive(Debug, Clone)]
pub struct NewFileSession {
    pub id: Uuid,
    pub owner_id: String,
    pub method: DistributionMethod,
    pub is_locked: bool,
    pub files: Vec<NewSessionFile>,
    pub allow_list: Vec<String>,
}

impl NewFileSession {
    /// The session as it reads back once recorded at `created_at`
    pub fn into_session(self, created_at: DateTime<Utc>) -> FileSession {
        let session_id = self.id;
        FileSession {
            id: self.id,
            owner_id: self.owner_id,
            method: self.method,
            is_locked: self.is_locked,
            created_at,
            files: self
                .files
                .into_iter()
                .map(|file| SessionFile {
                    id: file.id,
                    session_id,
                    name: file.name,
                    size: file.size,
                    content_type: file.content_type,
                    url: file.url,
                    storage_key: file.storage_key,
                    metadata: file.metadata,
                })
                .collect(),
            allow_list: self
                .allow_list
                .into_iter()
                .map(|email| AllowListEntry { session_id, email })
                .collect(),
        }
    }
}

/// A file whose bytes are already in storage, waiting to be recorded
#[derive(Debug, Clone)]
pub struct NewSessionFile {
    pub id: Uuid,
    pub name: String,
    pub size: i64,
    pub content_type: String,
    pub url: String,
    pub storage_key: String,
    pub metadata: Option<JsonValue>,
}

/// File entry in a session response
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionFileItem {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: i64,
    /// Human readable size, e.g. "2.4 MB"
    pub size_display: String,
    pub kind: FileKind,
    /// Storage locator
    pub url: String,
    /// Access-checked download route, filled in by the HTTP layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl From<&SessionFile> for SessionFileItem {
    fn from(file: &SessionFile) -> Self {
        Self {
            id: file.id,
            name: file.name.clone(),
            content_type: file.content_type.clone(),
            size: file.size,
            size_display: format_file_size(file.size.max(0) as u64),
            kind: FileKind::from_content_type(&file.content_type),
            url: file.url.clone(),
            download_url: None,
        }
    }
}

/// Session as returned to an authorized viewer
///
/// The allow-list is never exposed to viewers.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub method: DistributionMethod,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
    pub files: Vec<SessionFileItem>,
}

impl From<&FileSession> for SessionResponse {
    fn from(session: &FileSession) -> Self {
        Self {
            id: session.id,
            method: session.method,
            is_locked: session.is_locked,
            created_at: session.created_at,
            files: session.files.iter().map(SessionFileItem::from).collect(),
        }
    }
}

impl SessionResponse {
    /// Point every file at `{api_prefix}/sessions/{session_id}/files/{file_id}`.
    pub fn with_download_urls(mut self, api_prefix: &str) -> Self {
        let prefix = api_prefix.trim_end_matches('/');
        for file in &mut self.files {
            file.download_url = Some(format!(
                "{}/sessions/{}/files/{}",
                prefix, self.id, file.id
            ));
        }
        self
    }
}
