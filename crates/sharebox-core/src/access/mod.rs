//! Session access rules.
//!
//! [`authorize`] is a pure function of the session and the requester's
//! verified email: it performs no I/O, holds no state and returns the same
//! decision for the same inputs.

mod viewer;

pub use viewer::{InvalidTransition, ViewerState};

use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

use crate::models::FileSession;
use crate::validation::emails_match;

/// Why a requester was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The session is locked and no identity was presented
    AuthenticationRequired,
    /// The presented identity is not on the allow-list
    NotAuthorized,
}

/// Result of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// Turn a denial into an error so handlers can use `?`.
    pub fn into_result(self) -> Result<(), AccessDenied> {
        match self {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny(reason) => Err(AccessDenied(reason)),
        }
    }
}

/// A denied access check, as an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct AccessDenied(pub DenyReason);

impl DenyReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::AuthenticationRequired => "Sign in to access these files",
            DenyReason::NotAuthorized => "You don't have permission to access these files",
        }
    }
}

impl Display for DenyReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.message())
    }
}

/// Decide whether `requester_email` may view and download the session's files.
///
/// Unlocked sessions are open to everyone, including anonymous requesters.
/// Locked sessions require an identity whose email matches an allow-list
/// entry, compared case-insensitively. The owner gets no implicit pass.
pub fn authorize(session: &FileSession, requester_email: Option<&str>) -> AccessDecision {
    if !session.is_locked {
        return AccessDecision::Allow;
    }

    let Some(email) = requester_email else {
        return AccessDecision::Deny(DenyReason::AuthenticationRequired);
    };

    if session
        .allow_list
        .iter()
        .any(|entry| emails_match(&entry.email, email))
    {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::NotAuthorized)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::session;
    use super::*;

    #[test]
    fn test_unlocked_session_allows_everyone() {
        let session = session(false, &[]);
        assert_eq!(authorize(&session, None), AccessDecision::Allow);
        assert_eq!(
            authorize(&session, Some("anyone@example.com")),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_unlocked_session_ignores_allow_list() {
        let session = session(false, &["user@example.com"]);
        assert_eq!(
            authorize(&session, Some("other@example.com")),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_locked_session_matches_case_insensitively() {
        let session = session(true, &["user@example.com"]);
        assert_eq!(
            authorize(&session, Some("USER@EXAMPLE.COM")),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_locked_session_denies_unlisted_email() {
        let session = session(true, &["user@example.com"]);
        assert_eq!(
            authorize(&session, Some("other@example.com")),
            AccessDecision::Deny(DenyReason::NotAuthorized)
        );
    }

    #[test]
    fn test_locked_session_requires_identity() {
        let session = session(true, &["user@example.com"]);
        assert_eq!(
            authorize(&session, None),
            AccessDecision::Deny(DenyReason::AuthenticationRequired)
        );
    }

    #[test]
    fn test_locked_session_with_empty_allow_list_denies_everyone() {
        let session = session(true, &[]);
        assert_eq!(
            authorize(&session, Some("user@example.com")),
            AccessDecision::Deny(DenyReason::NotAuthorized)
        );
    }

    #[test]
    fn test_any_allow_list_entry_grants_access() {
        let session = session(true, &["a@example.com", "b@example.com"]);
        assert!(authorize(&session, Some("b@example.com")).is_allowed());
    }

    #[test]
    fn test_authorize_is_idempotent() {
        let session = session(true, &["user@example.com"]);
        for requester in [None, Some("user@example.com"), Some("other@example.com")] {
            let first = authorize(&session, requester);
            let second = authorize(&session, requester);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_into_result_maps_denial_to_error() {
        assert!(AccessDecision::Allow.into_result().is_ok());
        let err = AccessDecision::Deny(DenyReason::NotAuthorized)
            .into_result()
            .unwrap_err();
        assert_eq!(err.0, DenyReason::NotAuthorized);
        assert_eq!(
            err.to_string(),
            "You don't have permission to access these files"
        );
    }
}
