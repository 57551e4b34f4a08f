pub mod email;
pub mod sharing;

pub use email::EmailService;
pub use sharing::SharingService;
