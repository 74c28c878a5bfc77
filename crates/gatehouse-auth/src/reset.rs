//! Password-reset tokens
//!
//! A reset token is a single-use secret bound to one user. Consuming it
//! writes the new password hash and clears the token in the same update,
//! so a consumed token can never authorize a second change.
//!
//! Tokens carry no expiry.

use gatehouse_db::{Database, DbError, UserFilter, UserPatch};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AuthError;
use crate::password::hash_password;

/// Issues and consumes password-reset tokens
#[derive(Clone)]
pub struct ResetTokenManager {
    db: Database,
}

impl ResetTokenManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Issue a reset token for the user with this email
    ///
    /// Fails with `AuthError::UserNotFound` when the email resolves to
    /// no user.
    pub async fn issue_token(&self, email: &str) -> Result<String, AuthError> {
        let user = match self
            .db
            .find_user_by(UserFilter::Email(email.to_string()))
            .await
        {
            Ok(user) => user,
            Err(DbError::NotFound(_)) => return Err(AuthError::UserNotFound),
            Err(e) => return Err(e.into()),
        };

        let reset_token = Uuid::new_v4().to_string();
        self.db
            .update_user(
                user.id,
                UserPatch {
                    reset_token: Some(Some(reset_token.clone())),
                    ..Default::default()
                },
            )
            .await?;

        debug!(user_id = user.id, "Reset token issued");
        Ok(reset_token)
    }

    /// Consume a reset token and set a new password
    ///
    /// Fails with `AuthError::InvalidToken` when the token resolves to no
    /// user. The new hash and the cleared token are written in a single
    /// record update.
    pub async fn consume_token(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let user = match self
            .db
            .find_user_by(UserFilter::ResetToken(token.to_string()))
            .await
        {
            Ok(user) => user,
            Err(DbError::NotFound(_)) => return Err(AuthError::InvalidToken),
            Err(e) => return Err(e.into()),
        };

        let password_hash = hash_password(new_password)?;
        self.db
            .update_user(
                user.id,
                UserPatch {
                    password_hash: Some(password_hash),
                    reset_token: Some(None),
                    ..Default::default()
                },
            )
            .await?;

        info!(user_id = user.id, "Password updated via reset token");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialVerifier;
    use gatehouse_db::NewUser;

    async fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::new(&url).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn issue_for_unknown_email_fails() {
        let (db, _dir) = test_db().await;
        let resets = ResetTokenManager::new(db);

        let err = resets.issue_token("nobody@b.com").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn token_is_single_use() {
        let (db, _dir) = test_db().await;
        db.insert_user(NewUser {
            email: "a@b.com".to_string(),
            password_hash: hash_password("pw1").unwrap(),
        })
        .await
        .unwrap();
        let resets = ResetTokenManager::new(db);

        let token = resets.issue_token("a@b.com").await.unwrap();
        resets.consume_token(&token, "newpw").await.unwrap();

        let err = resets.consume_token(&token, "again").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn consume_replaces_password() {
        let (db, _dir) = test_db().await;
        db.insert_user(NewUser {
            email: "a@b.com".to_string(),
            password_hash: hash_password("pw1").unwrap(),
        })
        .await
        .unwrap();
        let verifier = CredentialVerifier::new(db.clone());
        let resets = ResetTokenManager::new(db);

        let token = resets.issue_token("a@b.com").await.unwrap();
        resets.consume_token(&token, "newpw").await.unwrap();

        assert!(verifier.verify_login("a@b.com", "newpw").await.unwrap());
        assert!(!verifier.verify_login("a@b.com", "pw1").await.unwrap());
    }

    #[tokio::test]
    async fn garbage_token_fails() {
        let (db, _dir) = test_db().await;
        let resets = ResetTokenManager::new(db);

        let err = resets.consume_token("not-a-token", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
