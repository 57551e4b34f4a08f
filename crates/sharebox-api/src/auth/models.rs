use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// JWT claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String, // user_id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Absent means the provider vouches for the address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>, // not-before timestamp (optional)
}

impl IdentityClaims {
    /// The email address, only if the provider verified it
    pub fn verified_email(&self) -> Option<&str> {
        if self.email_verified == Some(false) {
            return None;
        }
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// Signed-in user, stored in request extensions by the identity middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<IdentityClaims> for AuthenticatedUser {
    fn from(claims: IdentityClaims) -> Self {
        let email = claims.verified_email().map(String::from);
        Self {
            user_id: claims.sub,
            email,
        }
    }
}

// Extracted from request parts so it can be combined with Multipart
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                let mut body = ErrorResponse::new("Sign in to share files", "UNAUTHORIZED");
                body.suggested_action = Some("Check authentication token".to_string());
                (StatusCode::UNAUTHORIZED, Json(body))
            })
    }
}

/// Whoever is asking for a session: a signed-in user or nobody
#[derive(Debug, Clone, Default)]
pub struct Requester(pub Option<AuthenticatedUser>);

impl Requester {
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// Verified email of the requester, if any
    pub fn email(&self) -> Option<&str> {
        self.0.as_ref().and_then(|user| user.email.as_deref())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_none()
    }
}

impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Requester(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}
