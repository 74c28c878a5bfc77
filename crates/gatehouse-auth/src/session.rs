//! Session lifecycle management
//!
//! Sessions live as an opaque identifier on the user record itself; the
//! column is the single source of truth and survives process restart.

use gatehouse_db::{Database, DbError, User, UserFilter, UserPatch};
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;

/// Issues, resolves and revokes opaque session identifiers
#[derive(Clone)]
pub struct SessionManager {
    db: Database,
}

impl SessionManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open a session for the user with this email
    ///
    /// Returns `Ok(None)` when the email resolves to no user. Session
    /// operations signal failure by absence, not by error; registration
    /// and reset flows use the opposite discipline.
    pub async fn create_session(&self, email: &str) -> Result<Option<String>, AuthError> {
        let user = match self
            .db
            .find_user_by(UserFilter::Email(email.to_string()))
            .await
        {
            Ok(user) => user,
            Err(DbError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session_id = Uuid::new_v4().to_string();
        self.db
            .update_user(
                user.id,
                UserPatch {
                    session_id: Some(Some(session_id.clone())),
                    ..Default::default()
                },
            )
            .await?;

        debug!(user_id = user.id, "Session created");
        Ok(Some(session_id))
    }

    /// Resolve a session id back to its user
    ///
    /// An empty or unknown id is `Ok(None)`, never an error.
    pub async fn resolve_session(&self, session_id: &str) -> Result<Option<User>, AuthError> {
        if session_id.is_empty() {
            return Ok(None);
        }

        match self
            .db
            .find_user_by(UserFilter::SessionId(session_id.to_string()))
            .await
        {
            Ok(user) => Ok(Some(user)),
            Err(DbError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Clear the user's session
    ///
    /// Idempotent: clearing a user without an active session, or an
    /// unknown user id, succeeds.
    pub async fn destroy_session(&self, user_id: i64) -> Result<(), AuthError> {
        let patch = UserPatch {
            session_id: Some(None),
            ..Default::default()
        };
        match self.db.update_user(user_id, patch).await {
            Ok(()) => {
                debug!(user_id, "Session destroyed");
                Ok(())
            }
            Err(DbError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
