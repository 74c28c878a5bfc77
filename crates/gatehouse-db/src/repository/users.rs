//! User operations

use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use crate::error::DbError;
use crate::models::{NewUser, User, UserFilter, UserPatch};
use crate::repository::Database;

const USER_COLUMNS: &str = "id, email, password_hash, session_id, reset_token, created_at, updated_at";

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        // Check if the email is already taken
        match self.find_user_by(UserFilter::Email(user.email.clone())).await {
            Ok(_) => {
                return Err(DbError::Duplicate(format!(
                    "user '{}' already exists",
                    user.email
                )));
            }
            Err(DbError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            session_id: None,
            reset_token: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Find a single user by a lookup key
    ///
    /// Fails with `DbError::NotFound` when no row matches.
    pub async fn find_user_by(&self, filter: UserFilter) -> Result<User, DbError> {
        debug!("Looking up user by {}", filter.column());

        let sql = format!(
            "SELECT {} FROM users WHERE {} = ?",
            USER_COLUMNS,
            filter.column()
        );
        let query = sqlx::query(&sql);
        let query = match &filter {
            UserFilter::Id(id) => query.bind(*id),
            UserFilter::Email(v) | UserFilter::SessionId(v) | UserFilter::ResetToken(v) => {
                query.bind(v)
            }
        };

        let row = query.fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(User::try_from(&row)?),
            None => Err(DbError::NotFound(format!(
                "no user matching {}",
                filter.column()
            ))),
        }
    }

    /// Apply a partial update to a user record
    ///
    /// A single atomic UPDATE: every field carried by the patch lands in one
    /// statement. Fails with `InvalidQuery` for an empty patch and `NotFound`
    /// when the id does not exist.
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<(), DbError> {
        if patch.is_empty() {
            return Err(DbError::InvalidQuery("empty user patch".to_string()));
        }

        let now = Utc::now();

        // Build dynamic update query
        let mut updates = vec!["updated_at = ?".to_string()];
        if patch.email.is_some() {
            updates.push("email = ?".to_string());
        }
        if patch.password_hash.is_some() {
            updates.push("password_hash = ?".to_string());
        }
        if patch.session_id.is_some() {
            updates.push("session_id = ?".to_string());
        }
        if patch.reset_token.is_some() {
            updates.push("reset_token = ?".to_string());
        }

        let sql = format!("UPDATE users SET {} WHERE id = ?", updates.join(", "));
        let mut query = sqlx::query(&sql);

        // Bind updated_at first, then optional fields in the same order as updates
        query = query.bind(now.to_rfc3339());
        if let Some(ref v) = patch.email {
            query = query.bind(v);
        }
        if let Some(ref v) = patch.password_hash {
            query = query.bind(v);
        }
        if let Some(ref v) = patch.session_id {
            query = query.bind(v.clone());
        }
        if let Some(ref v) = patch.reset_token {
            query = query.bind(v.clone());
        }
        query = query.bind(id);

        let result = query.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::new(&url).await.unwrap();
        (db, dir)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$fake-hash".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_find_by_email() {
        let (db, _dir) = test_db().await;

        let user = db.insert_user(new_user("a@b.com")).await.unwrap();
        assert_eq!(user.email, "a@b.com");
        assert!(user.session_id.is_none());
        assert!(user.reset_token.is_none());

        let found = db
            .find_user_by(UserFilter::Email("a@b.com".to_string()))
            .await
            .unwrap();
        assert_eq!(found.id, user.id);

        let by_id = db.find_user_by(UserFilter::Id(user.id)).await.unwrap();
        assert_eq!(by_id.email, "a@b.com");
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let (db, _dir) = test_db().await;

        let first = db.insert_user(new_user("a@b.com")).await.unwrap();
        let err = db.insert_user(new_user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));

        // First record unaffected
        let found = db.find_user_by(UserFilter::Id(first.id)).await.unwrap();
        assert_eq!(found.email, "a@b.com");
        assert_eq!(found.password_hash, first.password_hash);
    }

    #[tokio::test]
    async fn find_missing_user_is_not_found() {
        let (db, _dir) = test_db().await;

        let err = db
            .find_user_by(UserFilter::Email("nobody@b.com".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));

        let err = db
            .find_user_by(UserFilter::SessionId("no-such-session".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[tokio::test]
    async fn patch_sets_and_clears_session() {
        let (db, _dir) = test_db().await;
        let user = db.insert_user(new_user("a@b.com")).await.unwrap();

        db.update_user(
            user.id,
            UserPatch {
                session_id: Some(Some("sess-1".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let found = db
            .find_user_by(UserFilter::SessionId("sess-1".to_string()))
            .await
            .unwrap();
        assert_eq!(found.id, user.id);

        db.update_user(
            user.id,
            UserPatch {
                session_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = db
            .find_user_by(UserFilter::SessionId("sess-1".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_patch_is_invalid() {
        let (db, _dir) = test_db().await;
        let user = db.insert_user(new_user("a@b.com")).await.unwrap();

        let err = db.update_user(user.id, UserPatch::default()).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn patch_unknown_id_is_not_found() {
        let (db, _dir) = test_db().await;

        let err = db
            .update_user(
                9999,
                UserPatch {
                    session_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[tokio::test]
    async fn password_and_token_update_is_single_write() {
        let (db, _dir) = test_db().await;
        let user = db.insert_user(new_user("a@b.com")).await.unwrap();

        db.update_user(
            user.id,
            UserPatch {
                reset_token: Some(Some("tok-1".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // The reset consumption shape: new hash and cleared token in one patch
        db.update_user(
            user.id,
            UserPatch {
                password_hash: Some("$argon2id$new-hash".to_string()),
                reset_token: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let found = db.find_user_by(UserFilter::Id(user.id)).await.unwrap();
        assert_eq!(found.password_hash, "$argon2id$new-hash");
        assert!(found.reset_token.is_none());
    }

    #[tokio::test]
    async fn has_users_reflects_table_state() {
        let (db, _dir) = test_db().await;
        assert!(!db.has_users().await.unwrap());

        db.insert_user(new_user("a@b.com")).await.unwrap();
        assert!(db.has_users().await.unwrap());
    }
}
