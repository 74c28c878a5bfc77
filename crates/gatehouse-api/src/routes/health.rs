//! Welcome and health endpoints

use axum::{Json, Router, routing::get};

use crate::state::AppState;

use super::types::{MessageResponse, StatusResponse};

/// Welcome handler
async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Bienvenue".to_string(),
    })
}

/// Health check handler
async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "OK".to_string(),
    })
}

/// Create welcome and health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/api/v1/status", get(status))
        .route("/api/v1/status/", get(status))
}
