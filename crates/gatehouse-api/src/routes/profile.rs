//! Profile route

use axum::{Json, Router, routing::get};
use gatehouse_auth::CurrentUser;

use crate::state::AppState;

use super::types::ProfileResponse;

/// GET /profile
async fn profile(CurrentUser(user): CurrentUser) -> Json<ProfileResponse> {
    Json(ProfileResponse { email: user.email })
}

/// Create profile routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}
