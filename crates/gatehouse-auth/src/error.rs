//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No credential material was presented where one is required
    #[error("Missing credentials")]
    Unauthenticated,

    /// Credential material was presented but did not resolve to a user
    #[error("Invalid credentials")]
    Forbidden,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid reset token")]
    InvalidToken,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] gatehouse_db::DbError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            AuthError::UserNotFound => (StatusCode::FORBIDDEN, "email not found"),
            AuthError::InvalidToken => (StatusCode::FORBIDDEN, "Invalid reset token"),
            AuthError::PasswordHash(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
            AuthError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        };

        // Gate denials report under "error", reset-flow failures under
        // "message"; clients depend on both shapes.
        let body = match &self {
            AuthError::UserNotFound | AuthError::InvalidToken => {
                axum::Json(json!({ "message": message }))
            }
            _ => axum::Json(json!({ "error": message })),
        };

        (status, body).into_response()
    }
}
