//! Password-reset routes

use axum::{
    Json, Router,
    extract::State,
    routing::{post, put},
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{
    ResetTokenRequest, ResetTokenResponse, UpdatePasswordRequest, UpdatePasswordResponse,
};

/// POST /reset_password
async fn request_reset(
    State(state): State<AppState>,
    Json(request): Json<ResetTokenRequest>,
) -> Result<Json<ResetTokenResponse>, ApiError> {
    if request.email.is_empty() {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    }

    debug!("Reset token requested for {}", request.email);

    let reset_token = state.resets.issue_token(&request.email).await?;

    Ok(Json(ResetTokenResponse {
        email: request.email,
        reset_token,
    }))
}

/// PUT /reset_password
async fn update_password(
    State(state): State<AppState>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<Json<UpdatePasswordResponse>, ApiError> {
    if request.email.is_empty() || request.reset_token.is_empty() || request.new_password.is_empty()
    {
        return Err(ApiError::BadRequest(
            "Email, reset token and new password are required".to_string(),
        ));
    }

    state
        .resets
        .consume_token(&request.reset_token, &request.new_password)
        .await?;

    Ok(Json(UpdatePasswordResponse {
        email: request.email,
        message: "Password updated".to_string(),
    }))
}

/// Create password-reset routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reset_password", post(request_reset))
        .route("/reset_password", put(update_password))
}
