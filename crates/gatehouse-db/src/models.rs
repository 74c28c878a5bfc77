//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// User model
///
/// The credential columns never leave the process through serialization:
/// `password_hash`, `session_id` and `reset_token` are skipped so a model
/// that ends up in a response body cannot leak them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub session_id: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

/// Lookup key for a single user.
///
/// A closed enum instead of free-form attribute names: a filter on a column
/// that is not indexed for lookup is unrepresentable.
#[derive(Debug, Clone)]
pub enum UserFilter {
    Id(i64),
    Email(String),
    SessionId(String),
    ResetToken(String),
}

impl UserFilter {
    /// Column the filter matches against
    pub fn column(&self) -> &'static str {
        match self {
            UserFilter::Id(_) => "id",
            UserFilter::Email(_) => "email",
            UserFilter::SessionId(_) => "session_id",
            UserFilter::ResetToken(_) => "reset_token",
        }
    }
}

/// Partial update of a user record.
///
/// Enumerates exactly the updatable columns. Nullable columns take
/// `Option<Option<String>>` so a patch can distinguish "leave alone"
/// (outer `None`) from "set to NULL" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub session_id: Option<Option<String>>,
    pub reset_token: Option<Option<String>>,
}

impl UserPatch {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password_hash.is_none()
            && self.session_id.is_none()
            && self.reset_token.is_none()
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            session_id: row.try_get("session_id")?,
            reset_token: row.try_get("reset_token")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}
