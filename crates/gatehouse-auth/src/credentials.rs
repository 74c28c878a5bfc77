//! Login credential verification

use gatehouse_db::{Database, DbError, User, UserFilter};
use tracing::debug;

use crate::error::AuthError;
use crate::password::verify_password;

/// A valid Argon2 hash that no password verifies against. Used when the
/// email resolves to no user, so the lookup-failure path performs the same
/// hashing work as the wrong-password path.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nX2F0dGFja19wcmV2ZW50aW9u$K8rI5T7VdQ8xkO0GqK5K2w";

/// Validates submitted email/password pairs against the user store
#[derive(Clone)]
pub struct CredentialVerifier {
    db: Database,
}

impl CredentialVerifier {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Resolve an email/password pair to its user
    ///
    /// Returns `Ok(None)` both for an unknown email and for a wrong
    /// password; the two failures are indistinguishable to the caller.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        debug!("Verifying credentials for {}", email);

        let user = match self
            .db
            .find_user_by(UserFilter::Email(email.to_string()))
            .await
        {
            Ok(user) => Some(user),
            Err(DbError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };

        // Always run the verifier, against a dummy hash when the user
        // does not exist.
        let hash = match &user {
            Some(u) => u.password_hash.as_str(),
            None => DUMMY_HASH,
        };
        let password_valid = verify_password(password, hash)?;

        match (user, password_valid) {
            (Some(u), true) => Ok(Some(u)),
            _ => Ok(None),
        }
    }

    /// Check a submitted email/password pair
    pub async fn verify_login(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        Ok(self.authenticate(email, password).await?.is_some())
    }
}
