//! Validation modules

pub mod email;
pub mod submission;

pub use email::{emails_match, is_plausible_email, normalize_email};
pub use submission::{SizeViolation, SubmissionError, UploadValidator};
