pub mod session_download;
pub mod session_get;
pub mod session_upload;
