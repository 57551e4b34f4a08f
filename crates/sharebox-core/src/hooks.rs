//! Hooks for outbound side effects
//!
//! The core only knows that a recipient may need to be told about a share.
//! How the message is delivered (SMTP, a queue, nothing at all) is decided by
//! whoever implements [`ShareNotifier`].

use std::sync::Arc;

use async_trait::async_trait;

/// Tells a recipient that files were shared with them.
///
/// Failures are returned as plain strings: a failed notification is surfaced
/// to the uploader as a warning and never undoes the share.
#[async_trait]
pub trait ShareNotifier: Send + Sync {
    async fn notify_recipient(&self, to: &str, session_link: &str) -> Result<(), String>;
}

#[async_trait]
impl<T: ShareNotifier + ?Sized> ShareNotifier for Arc<T> {
    async fn notify_recipient(&self, to: &str, session_link: &str) -> Result<(), String> {
        (**self).notify_recipient(to, session_link).await
    }
}

/// Used when email delivery is disabled.
///
/// Every notification is reported as undelivered so EMAIL shares fall back to
/// the link message and a warning instead of claiming an email was sent.
pub struct DisabledShareNotifier;

#[async_trait]
impl ShareNotifier for DisabledShareNotifier {
    async fn notify_recipient(&self, _to: &str, _session_link: &str) -> Result<(), String> {
        Err("email delivery is disabled".to_string())
    }
}
