//! Application state

use gatehouse_auth::{AuthGate, CredentialVerifier, ResetTokenManager, SessionManager};
use gatehouse_db::Database;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub gate: Arc<AuthGate>,
    pub verifier: CredentialVerifier,
    pub sessions: SessionManager,
    pub resets: ResetTokenManager,
}

impl AppState {
    pub fn new(db: Database, gate: Arc<AuthGate>) -> Self {
        Self {
            verifier: CredentialVerifier::new(db.clone()),
            sessions: SessionManager::new(db.clone()),
            resets: ResetTokenManager::new(db.clone()),
            db,
            gate,
        }
    }
}
