//! Shared key generation for storage backends.
//!
//! Key format: `sessions/{session_id}/{file_id}-{sanitized_filename}`.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

const MAX_FILENAME_CHARS: usize = 128;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("filename regex is valid"));

/// Reduce a user supplied filename to characters that are safe in every backend.
///
/// Anything outside `[A-Za-z0-9._-]` becomes `_`, leading dots are dropped and
/// the result is capped at 128 characters. An empty result falls back to `file`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned = UNSAFE_CHARS.replace_all(base, "_");
    let cleaned: String = cleaned
        .trim_start_matches('.')
        .chars()
        .take(MAX_FILENAME_CHARS)
        .collect();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Generate the storage key for one file of a session.
///
/// All backends must use this format so keys recorded in the database stay
/// valid when the backend changes.
pub fn session_file_key(session_id: Uuid, file_id: Uuid, filename: &str) -> String {
    format!(
        "sessions/{}/{}-{}",
        session_id,
        file_id,
        sanitize_filename(filename)
    )
}
