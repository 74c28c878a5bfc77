//! Login and logout routes

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{delete, post},
};
use gatehouse_auth::gate::cookie_value;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse, MessageResponse};

/// Session cookie for a fresh login
fn session_cookie(name: &str, session_id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly", name, session_id)
}

/// Expired session cookie, clears the browser's copy
fn clear_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", name)
}

/// POST /sessions
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    debug!("Login attempt for {}", request.email);

    if !state
        .verifier
        .verify_login(&request.email, &request.password)
        .await?
    {
        return Err(ApiError::Unauthorized);
    }

    let session_id = state
        .sessions
        .create_session(&request.email)
        .await?
        .ok_or_else(|| ApiError::Internal("session creation failed".to_string()))?;

    info!("User {} logged in", request.email);

    let headers = AppendHeaders([(
        SET_COOKIE,
        session_cookie(state.gate.cookie_name(), &session_id),
    )]);
    let body = Json(LoginResponse {
        email: request.email,
        message: "logged in".to_string(),
    });
    Ok((headers, body).into_response())
}

/// DELETE /sessions
///
/// The logout route resolves its own cookie instead of sitting behind
/// the gate: a missing or stale cookie is a 403 here, matching the
/// session-destruction contract rather than the gate's two-stage denial.
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session_id = cookie_value(&headers, state.gate.cookie_name())
        .ok_or(ApiError::Forbidden)?;

    let user = state
        .sessions
        .resolve_session(&session_id)
        .await?
        .ok_or(ApiError::Forbidden)?;

    state.sessions.destroy_session(user.id).await?;

    info!("User {} logged out", user.email);

    let set_cookie = AppendHeaders([(SET_COOKIE, clear_cookie(state.gate.cookie_name()))]);
    let body = Json(MessageResponse {
        message: "logged out".to_string(),
    });
    Ok((set_cookie, body).into_response())
}

/// Create session routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(login))
        .route("/sessions", delete(logout))
}
