use crate::auth::models::AuthenticatedUser;
use crate::error::HttpAppError;
use crate::state::AuthState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sharebox_core::AppError;

/// Resolve the bearer token, if any, into an [`AuthenticatedUser`].
///
/// A request without an `Authorization` header passes through anonymously;
/// routes decide whether that is enough. A header that is present but
/// malformed, expired or badly signed is rejected with 401.
pub async fn identity_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request.headers().get(AUTHORIZATION) {
        None => return next.run(request).await,
        Some(value) => match value.to_str() {
            Ok(h) => h,
            Err(_) => {
                return HttpAppError(AppError::Unauthorized(
                    "Invalid authorization header encoding".to_string(),
                ))
                .into_response();
            }
        },
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    match auth_state.jwt.validate_token(token.trim()) {
        Ok(claims) => {
            let user = AuthenticatedUser::from(claims);
            tracing::debug!(
                user_id = %user.user_id,
                has_verified_email = user.email.is_some(),
                "Request authenticated"
            );
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}
