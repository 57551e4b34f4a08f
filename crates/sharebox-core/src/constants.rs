//! Limits shared by the validator, the configuration defaults and the HTTP layer.

/// Default per-file upload limit (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of files accepted in a single submission.
pub const DEFAULT_MAX_FILES_PER_SESSION: usize = 100;
