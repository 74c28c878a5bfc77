//! Registration routes

use axum::{Json, Router, extract::State, routing::post};
use gatehouse_auth::hash_password;
use gatehouse_db::{DbError, NewUser};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{RegisterRequest, RegisterResponse};

/// POST /users
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    debug!("Registering {}", request.email);

    let password_hash = hash_password(&request.password)?;

    let user = match state
        .db
        .insert_user(NewUser {
            email: request.email,
            password_hash,
        })
        .await
    {
        Ok(user) => user,
        Err(DbError::Duplicate(_)) => {
            return Err(ApiError::BadRequest("email already registered".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    info!("User {} registered", user.email);

    Ok(Json(RegisterResponse {
        email: user.email,
        message: "user created".to_string(),
    }))
}

/// Create registration routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}
