use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::errors::AuthError;
use crate::state::AppState;

/// Authenticated username taken from a `Bearer` token.
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                (StatusCode::UNAUTHORIZED, "Missing Authorization header").into_response()
            })?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Invalid auth scheme").into_response())?;

        match state.accounts.authenticate(token).await {
            Ok(username) => Ok(AuthUser(username)),
            Err(e @ AuthError::Store(_)) => Err(e.into_response()),
            Err(e) => {
                warn!(error = %e, "bearer token rejected");
                // a deleted account behaves like a bad token
                Err((StatusCode::UNAUTHORIZED, "Authentication required").into_response())
            }
        }
    }
}
