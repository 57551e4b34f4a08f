//! HS256 JWT verification
//!
//! Tokens are signed with the shared `JWT_SECRET`. Only the identity the token
//! names is trusted; what that identity may see is decided per session.

use crate::auth::models::IdentityClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sharebox_core::AppError;

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate and decode a bearer token
    pub fn validate_token(&self, token: &str) -> Result<IdentityClaims, AppError> {
        let token_data =
            decode::<IdentityClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token has expired".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                        AppError::Unauthorized("Token is not yet valid (nbf)".to_string())
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::Unauthorized("Invalid token signature".to_string())
                    }
                    _ => AppError::Unauthorized(format!("Invalid or expired token: {}", e)),
                }
            })?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized("Invalid token subject".to_string()));
        }

        Ok(token_data.claims)
    }

    /// Sign a token for `user_id`. Used by tooling and tests standing in for the provider.
    pub fn issue_token(
        &self,
        user_id: &str,
        email: Option<&str>,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: user_id.to_string(),
            email: email.map(String::from),
            email_verified: email.map(|_| true),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            nbf: None,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-min-32-characters-long";

    #[test]
    fn test_issue_and_validate() {
        let service = JwtService::new(SECRET);
        let token = service
            .issue_token("user123", Some("user@example.com"), Duration::hours(1))
            .unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.verified_email(), Some("user@example.com"));
    }

    #[test]
    fn test_token_without_email() {
        let service = JwtService::new(SECRET);
        let token = service
            .issue_token("user123", None, Duration::hours(1))
            .unwrap();
        assert_eq!(service.validate_token(&token).unwrap().verified_email(), None);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(SECRET);
        let token = service
            .issue_token("user123", None, Duration::hours(-1))
            .unwrap();
        match service.validate_token(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token has expired"),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let issuer = JwtService::new("another-secret-key-min-32-characters-long");
        let token = issuer
            .issue_token("user123", None, Duration::hours(1))
            .unwrap();
        assert!(JwtService::new(SECRET).validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = JwtService::new(SECRET);
        assert!(matches!(
            service.validate_token("not-a-jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
