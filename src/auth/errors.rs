use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failures of the account and session flows.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password; the two are never distinguished.
    #[error("Invalid credential")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid password hash format")]
    InvalidHashFormat,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Store(err.to_string())
    }
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AuthError::UsernameTaken(_) => StatusCode::CONFLICT,
            AuthError::RoleNotFound(_)
            | AuthError::InvalidHashFormat
            | AuthError::Hashing(_)
            | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to clients. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "Invalid credential".into(),
            AuthError::InvalidToken | AuthError::TokenExpired => "Authentication required".into(),
            AuthError::UserNotFound(_) => "User not found".into(),
            AuthError::UsernameTaken(_) => "Username already taken".into(),
            AuthError::RoleNotFound(_) => {
                "Registration is unavailable: account roles are not configured".into()
            }
            AuthError::InvalidHashFormat | AuthError::Hashing(_) | AuthError::Store(_) => {
                "Internal server error".into()
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, self.public_message()).into_response()
    }
}
