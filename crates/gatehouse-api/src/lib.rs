//! Gatehouse REST API
//!
//! This crate provides the Axum-based HTTP surface for Gatehouse:
//! registration, login/logout, profile lookup and the password-reset
//! flow, with the admission gate in front of the protected routes.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
