//! Data models for the application
//!
//! Sessions and their files are the persisted shapes; the upload types are the
//! statically typed inputs and outputs of a share submission.

mod file_kind;
mod session;
mod upload;

pub use file_kind::*;
pub use session::*;
pub use upload::*;
