//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] gatehouse_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] gatehouse_auth::AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            // The auth layer carries its own status/body mapping
            ApiError::Auth(e) => return e.into_response(),

            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            // Request-shaped failures answer with "message" bodies
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" })),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, json!({ "error": "Forbidden" })),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            ApiError::Database(e) => match e {
                gatehouse_db::DbError::NotFound(msg) => {
                    (StatusCode::NOT_FOUND, json!({ "error": msg }))
                }
                gatehouse_db::DbError::Duplicate(_) => (
                    StatusCode::BAD_REQUEST,
                    json!({ "message": "email already registered" }),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Database error" }),
                ),
            },
        };

        (status, axum::Json(body)).into_response()
    }
}
