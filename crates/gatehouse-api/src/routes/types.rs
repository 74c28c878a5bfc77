//! Request/Response DTOs

use serde::{Deserialize, Serialize};

// ==================== Account Types ====================

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Registration response
#[derive(Serialize)]
pub struct RegisterResponse {
    pub email: String,
    pub message: String,
}

// ==================== Session Types ====================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub message: String,
}

// ==================== Profile Types ====================

/// Profile response
#[derive(Serialize)]
pub struct ProfileResponse {
    pub email: String,
}

// ==================== Reset Types ====================

/// Reset token request
#[derive(Deserialize)]
pub struct ResetTokenRequest {
    pub email: String,
}

/// Reset token response
#[derive(Serialize)]
pub struct ResetTokenResponse {
    pub email: String,
    pub reset_token: String,
}

/// Password update request
#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub email: String,
    pub reset_token: String,
    pub new_password: String,
}

/// Password update response
#[derive(Serialize)]
pub struct UpdatePasswordResponse {
    pub email: String,
    pub message: String,
}

// ==================== Misc Types ====================

/// Plain message response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
}
