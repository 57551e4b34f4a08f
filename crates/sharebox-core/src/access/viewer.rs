//! Viewer flow for a share page.
//!
//! Nothing here is stored; the state is rebuilt for each request from the
//! session lookup and the requester's identity.
//!
//! ```text
//! Loading -> NotFound | Unlocked | LockedPendingAuth
//! LockedPendingAuth -> Authorized | Denied
//! Denied -> LockedPendingAuth   (retry with another email)
//! ```

use serde::Serialize;
use utoipa::ToSchema;

use super::{authorize, AccessDecision};
use crate::models::FileSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewerState {
    Loading,
    NotFound,
    Unlocked,
    LockedPendingAuth,
    Authorized,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} while viewer is {from:?}")]
pub struct InvalidTransition {
    pub from: ViewerState,
    pub action: &'static str,
}

impl ViewerState {
    /// Every fresh lookup starts here, whatever the previous state was.
    pub fn reload(self) -> Self {
        ViewerState::Loading
    }

    pub fn on_lookup(self, session: Option<&FileSession>) -> Result<Self, InvalidTransition> {
        if self != ViewerState::Loading {
            return Err(InvalidTransition {
                from: self,
                action: "resolve a lookup",
            });
        }

        Ok(match session {
            None => ViewerState::NotFound,
            Some(session) if !session.is_locked => ViewerState::Unlocked,
            Some(_) => ViewerState::LockedPendingAuth,
        })
    }

    pub fn on_identity(
        self,
        session: &FileSession,
        requester_email: &str,
    ) -> Result<Self, InvalidTransition> {
        if self != ViewerState::LockedPendingAuth {
            return Err(InvalidTransition {
                from: self,
                action: "submit an identity",
            });
        }

        Ok(match authorize(session, Some(requester_email)) {
            AccessDecision::Allow => ViewerState::Authorized,
            AccessDecision::Deny(_) => ViewerState::Denied,
        })
    }

    /// A denied viewer may try again with a different email.
    pub fn retry(self) -> Result<Self, InvalidTransition> {
        match self {
            ViewerState::Denied => Ok(ViewerState::LockedPendingAuth),
            other => Err(InvalidTransition {
                from: other,
                action: "retry",
            }),
        }
    }

    pub fn grants_access(&self) -> bool {
        matches!(self, ViewerState::Unlocked | ViewerState::Authorized)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ViewerState::NotFound | ViewerState::Unlocked | ViewerState::Authorized
        )
    }

    pub fn message(&self) -> &'static str {
        match self {
            ViewerState::Loading => "Loading",
            ViewerState::NotFound => "Session not found",
            ViewerState::Unlocked => "Files are available",
            ViewerState::LockedPendingAuth => "These files are locked. Sign in to continue",
            ViewerState::Authorized => "Authentication successful",
            ViewerState::Denied => "You don't have permission to access these files",
        }
    }

    /// Run one request through the flow: look the session up, then present
    /// the requester's identity if the session is locked and one is known.
    pub fn evaluate(session: Option<&FileSession>, requester_email: Option<&str>) -> Self {
        let state = match ViewerState::Loading.on_lookup(session) {
            Ok(state) => state,
            Err(_) => return ViewerState::NotFound,
        };

        match (state, session, requester_email) {
            (ViewerState::LockedPendingAuth, Some(session), Some(email)) => {
                state.on_identity(session, email).unwrap_or(state)
            }
            _ => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::session;
    use super::*;

    #[test]
    fn test_lookup_outcomes() {
        assert_eq!(
            ViewerState::Loading.on_lookup(None),
            Ok(ViewerState::NotFound)
        );
        assert_eq!(
            ViewerState::Loading.on_lookup(Some(&session(false, &[]))),
            Ok(ViewerState::Unlocked)
        );
        assert_eq!(
            ViewerState::Loading.on_lookup(Some(&session(true, &[]))),
            Ok(ViewerState::LockedPendingAuth)
        );
    }

    #[test]
    fn test_lookup_only_from_loading() {
        let err = ViewerState::Unlocked.on_lookup(None).unwrap_err();
        assert_eq!(err.from, ViewerState::Unlocked);
    }

    #[test]
    fn test_identity_resolves_locked_session() {
        let locked = session(true, &["user@example.com"]);
        assert_eq!(
            ViewerState::LockedPendingAuth.on_identity(&locked, "User@Example.com"),
            Ok(ViewerState::Authorized)
        );
        assert_eq!(
            ViewerState::LockedPendingAuth.on_identity(&locked, "other@example.com"),
            Ok(ViewerState::Denied)
        );
    }

    #[test]
    fn test_identity_rejected_outside_pending_state() {
        let locked = session(true, &["user@example.com"]);
        assert!(ViewerState::Unlocked
            .on_identity(&locked, "user@example.com")
            .is_err());
        assert!(ViewerState::NotFound
            .on_identity(&locked, "user@example.com")
            .is_err());
    }

    #[test]
    fn test_denied_viewer_can_retry_with_another_email() {
        let locked = session(true, &["user@example.com"]);
        let denied = ViewerState::LockedPendingAuth
            .on_identity(&locked, "other@example.com")
            .unwrap();
        assert_eq!(denied, ViewerState::Denied);
        assert!(!denied.is_terminal());

        let pending = denied.retry().unwrap();
        assert_eq!(pending, ViewerState::LockedPendingAuth);
        assert_eq!(
            pending.on_identity(&locked, "user@example.com"),
            Ok(ViewerState::Authorized)
        );
    }

    #[test]
    fn test_retry_only_from_denied() {
        assert!(ViewerState::Authorized.retry().is_err());
        assert!(ViewerState::NotFound.retry().is_err());
    }

    #[test]
    fn test_terminal_states_and_access() {
        assert!(ViewerState::NotFound.is_terminal());
        assert!(!ViewerState::NotFound.grants_access());
        assert!(ViewerState::Unlocked.grants_access());
        assert!(ViewerState::Authorized.grants_access());
        assert!(!ViewerState::LockedPendingAuth.is_terminal());
        assert_eq!(ViewerState::Denied.reload(), ViewerState::Loading);
    }

    #[test]
    fn test_evaluate_single_request() {
        let locked = session(true, &["user@example.com"]);
        assert_eq!(ViewerState::evaluate(None, None), ViewerState::NotFound);
        assert_eq!(
            ViewerState::evaluate(Some(&session(false, &[])), None),
            ViewerState::Unlocked
        );
        assert_eq!(
            ViewerState::evaluate(Some(&locked), None),
            ViewerState::LockedPendingAuth
        );
        assert_eq!(
            ViewerState::evaluate(Some(&locked), Some("user@example.com")),
            ViewerState::Authorized
        );
        assert_eq!(
            ViewerState::evaluate(Some(&locked), Some("other@example.com")),
            ViewerState::Denied
        );
    }

    #[test]
    fn test_state_serializes_snake_case() {
        let json = serde_json::to_string(&ViewerState::LockedPendingAuth).unwrap();
        assert_eq!(json, "\"locked_pending_auth\"");
    }
}
