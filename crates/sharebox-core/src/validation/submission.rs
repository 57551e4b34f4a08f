//! Upload submission rules.
//!
//! Rules run in a fixed order and the first failure wins:
//! file selection, per-file size, recipient address (EMAIL only), lock address
//! (locked sessions only).

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::DEFAULT_MAX_FILE_SIZE_BYTES;
use crate::models::{DistributionMethod, DraftFile, SessionDraft, UploadSubmission};

use super::email::{is_plausible_email, normalize_email};

const MIB: u64 = 1024 * 1024;

/// Why a file's size was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeViolation {
    Empty,
    Exceeds { max_bytes: u64 },
}

impl Display for SizeViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SizeViolation::Empty => write!(f, "is empty"),
            SizeViolation::Exceeds { max_bytes } if max_bytes % MIB == 0 => {
                write!(f, "exceeds {}MB limit", max_bytes / MIB)
            }
            SizeViolation::Exceeds { max_bytes } => {
                write!(f, "exceeds {} byte limit", max_bytes)
            }
        }
    }
}

/// Submission rejections. All are user-input errors and are shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Please select at least one file to upload")]
    NoFilesSelected,

    #[error("File {name} {violation}")]
    FileTooLarge {
        name: String,
        violation: SizeViolation,
    },

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid email address to lock the files to")]
    InvalidLockEmail,
}

/// Validates share submissions against the configured per-file limit
#[derive(Debug, Clone, Copy)]
pub struct UploadValidator {
    max_file_size: u64,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE_BYTES)
    }
}

impl UploadValidator {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Decide whether a submission is acceptable and build the session draft.
    ///
    /// No I/O happens here; storing bytes and recording the session are the
    /// caller's job.
    pub fn validate(&self, submission: &UploadSubmission) -> Result<SessionDraft, SubmissionError> {
        self.check_selection(submission)?;
        self.check_sizes(submission)?;

        let recipient_email = match submission.method {
            DistributionMethod::Email => match submission.email.as_deref() {
                Some(email) if is_plausible_email(email) => {
                    Some(normalize_email(email))
                }
                _ => return Err(SubmissionError::InvalidEmail),
            },
            DistributionMethod::Link => None,
        };

        let allow_list = if submission.is_locked {
            match submission.lock_to_email.as_deref() {
                Some(email) if is_plausible_email(email) => {
                    vec![normalize_email(email)]
                }
                _ => return Err(SubmissionError::InvalidLockEmail),
            }
        } else {
            Vec::new()
        };

        Ok(SessionDraft {
            files: submission
                .files
                .iter()
                .map(|f| DraftFile {
                    name: f.name.clone(),
                    size: f.size,
                    content_type: f.content_type.clone(),
                })
                .collect(),
            method: submission.method,
            recipient_email,
            is_locked: submission.is_locked,
            allow_list,
        })
    }

    /// An empty batch, or a single zero-byte entry (what a form posts when
    /// nothing was picked), means nothing was selected.
    fn check_selection(&self, submission: &UploadSubmission) -> Result<(), SubmissionError> {
        match submission.files.as_slice() {
            [] => Err(SubmissionError::NoFilesSelected),
            [only] if only.size == 0 => Err(SubmissionError::NoFilesSelected),
            _ => Ok(()),
        }
    }

    fn check_sizes(&self, submission: &UploadSubmission) -> Result<(), SubmissionError> {
        for file in &submission.files {
            let violation = if file.size == 0 {
                SizeViolation::Empty
            } else if file.size > self.max_file_size {
                SizeViolation::Exceeds {
                    max_bytes: self.max_file_size,
                }
            } else {
                continue;
            };

            return Err(SubmissionError::FileTooLarge {
                name: file.name.clone(),
                violation,
            });
        }
        Ok(())
    }
}
