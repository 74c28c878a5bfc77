//! Authentication middleware for Axum

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use gatehouse_db::User;
use std::sync::Arc;
use tracing::debug;

use crate::error::AuthError;
use crate::gate::{AuthGate, Principal};

/// Admission middleware
///
/// Runs the gate for the request path; an admitted request carries its
/// `Principal` in the extensions, a denied one short-circuits with the
/// gate's 401/403 outcome.
pub async fn gate_middleware(
    State(gate): State<Arc<AuthGate>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let principal = gate
        .authorize(request.uri().path(), request.headers())
        .await?;

    if let Principal::User(user) = &principal {
        debug!(user_id = user.id, "Request authenticated");
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Extractor for the authenticated user behind the gate
///
/// Rejects with 401 when no principal was resolved for the request,
/// which only happens on routes the gate middleware does not cover.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Principal>() {
            Some(Principal::User(user)) => Ok(CurrentUser(user.clone())),
            _ => Err(AuthError::Unauthenticated),
        }
    }
}
