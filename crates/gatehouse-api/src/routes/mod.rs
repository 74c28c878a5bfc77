//! API routes

mod accounts;
mod health;
mod profile;
mod reset;
mod sessions;
pub mod types;

use axum::{Router, middleware};
use gatehouse_auth::gate_middleware;

use crate::state::AppState;

/// Create the main router
///
/// The gate middleware fronts the protected routes; everything else is
/// reachable without credentials (registration, login and the reset flow
/// authenticate by their own means).
pub fn create_router(state: AppState) -> Router {
    let gated = Router::new()
        .merge(profile::routes())
        .route_layer(middleware::from_fn_with_state(
            state.gate.clone(),
            gate_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(sessions::routes())
        .merge(reset::routes())
        .merge(gated)
        .with_state(state)
}
