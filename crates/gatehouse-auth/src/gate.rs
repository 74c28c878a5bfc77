//! Request admission policy
//!
//! The gate decides, for a path and the credential material a request
//! carries, whether the request is admitted and as whom. The denial
//! staging is two-step: *missing* credential material is 401,
//! *present-but-unresolvable* material is 403.

use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use base64::{Engine, engine::general_purpose::STANDARD};
use gatehouse_db::User;
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialVerifier;
use crate::error::AuthError;
use crate::session::SessionManager;

/// Credential scheme the gate runs in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// No authentication; every request is admitted
    Disabled,
    /// `Authorization: Basic <base64(email:password)>`
    Basic,
    /// Opaque session identifier in a named cookie
    Session,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Disabled => "disabled",
            AuthScheme::Basic => "basic",
            AuthScheme::Session => "session",
        }
    }
}

/// Resolved identity for an admitted request
#[derive(Debug, Clone)]
pub enum Principal {
    /// Admitted without credentials (gate disabled or exempt path)
    Anonymous,
    User(User),
}

impl Principal {
    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Anonymous => None,
            Principal::User(user) => Some(user),
        }
    }
}

/// Composes the verifier and the session manager into a request
/// admission policy
#[derive(Clone)]
pub struct AuthGate {
    scheme: AuthScheme,
    cookie_name: String,
    exempt_paths: Vec<String>,
    verifier: CredentialVerifier,
    sessions: SessionManager,
}

impl AuthGate {
    pub fn new(
        scheme: AuthScheme,
        cookie_name: impl Into<String>,
        exempt_paths: Vec<String>,
        verifier: CredentialVerifier,
        sessions: SessionManager,
    ) -> Self {
        Self {
            scheme,
            cookie_name: cookie_name.into(),
            exempt_paths,
            verifier,
            sessions,
        }
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Whether this path needs a credential
    ///
    /// Exempt entries match exactly up to a trailing slash; entries ending
    /// in `*` match as a prefix.
    pub fn requires_auth(&self, path: &str) -> bool {
        let path = normalize_path(path);

        !self.exempt_paths.iter().any(|pattern| {
            if let Some(prefix) = pattern.strip_suffix('*') {
                path.starts_with(prefix)
            } else {
                normalize_path(pattern) == path
            }
        })
    }

    /// Decide the admission outcome for a request
    pub async fn authorize(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<Principal, AuthError> {
        if self.scheme == AuthScheme::Disabled || !self.requires_auth(path) {
            return Ok(Principal::Anonymous);
        }

        let Some(material) = self.credential_material(headers) else {
            return Err(AuthError::Unauthenticated);
        };

        let user = match self.scheme {
            AuthScheme::Disabled => return Ok(Principal::Anonymous),
            AuthScheme::Basic => {
                let Some((email, password)) = decode_basic(&material) else {
                    return Err(AuthError::Forbidden);
                };
                self.verifier.authenticate(&email, &password).await?
            }
            AuthScheme::Session => self.sessions.resolve_session(&material).await?,
        };

        match user {
            Some(user) => Ok(Principal::User(user)),
            None => Err(AuthError::Forbidden),
        }
    }

    /// Raw credential material carried by the request, before resolution
    fn credential_material(&self, headers: &HeaderMap) -> Option<String> {
        match self.scheme {
            AuthScheme::Disabled => None,
            AuthScheme::Basic => headers
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string),
            AuthScheme::Session => cookie_value(headers, &self.cookie_name),
        }
    }
}

/// Compare form for exempt-path matching: always one trailing slash
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    format!("{}/", trimmed)
}

/// Parse a `Basic <base64(email:password)>` authorization header
fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded_str = String::from_utf8(decoded).ok()?;

    let mut parts = decoded_str.splitn(2, ':');
    match (parts.next(), parts.next()) {
        (Some(email), Some(password)) => Some((email.to_string(), password.to_string())),
        _ => None,
    }
}

/// Extract a cookie value from the Cookie header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    for cookie in cookie_str.split(';') {
        let mut parts = cookie.trim().splitn(2, '=');
        if let (Some(key), Some(value)) = (parts.next(), parts.next())
            && key == name
        {
            return Some(value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;
    use gatehouse_db::{Database, NewUser};

    fn gate_with(scheme: AuthScheme, db: Database, exempt: &[&str]) -> AuthGate {
        AuthGate::new(
            scheme,
            "session_id",
            exempt.iter().map(|s| s.to_string()).collect(),
            CredentialVerifier::new(db.clone()),
            SessionManager::new(db),
        )
    }

    async fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::new(&url).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn exempt_path_matching() {
        let (db, _dir) = test_db().await;
        let gate = gate_with(
            AuthScheme::Session,
            db,
            &["/api/v1/status/", "/api/v1/stat*"],
        );

        assert!(!gate.requires_auth("/api/v1/status/"));
        assert!(!gate.requires_auth("/api/v1/status"));
        assert!(!gate.requires_auth("/api/v1/stats"));
        assert!(gate.requires_auth("/api/v1/users"));
        assert!(gate.requires_auth("/profile"));
    }

    #[test]
    fn basic_header_decoding() {
        // "a@b.com:pw1"
        assert_eq!(
            decode_basic("Basic YUBiLmNvbTpwdzE="),
            Some(("a@b.com".to_string(), "pw1".to_string()))
        );
        // password may itself contain a colon
        // "a@b.com:pw:1"
        assert_eq!(
            decode_basic("Basic YUBiLmNvbTpwdzox"),
            Some(("a@b.com".to_string(), "pw:1".to_string()))
        );
        assert_eq!(decode_basic("Bearer something"), None);
        assert_eq!(decode_basic("Basic !!!not-base64!!!"), None);
        // no colon in the decoded payload ("abc")
        assert_eq!(decode_basic("Basic YWJj"), None);
    }

    #[test]
    fn cookie_header_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            "other=1; session_id=abc-123; theme=dark".parse().unwrap(),
        );

        assert_eq!(
            cookie_value(&headers, "session_id"),
            Some("abc-123".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
        assert_eq!(cookie_value(&HeaderMap::new(), "session_id"), None);
    }

    #[tokio::test]
    async fn disabled_scheme_admits_everything() {
        let (db, _dir) = test_db().await;
        let gate = gate_with(AuthScheme::Disabled, db, &[]);

        let principal = gate.authorize("/profile", &HeaderMap::new()).await.unwrap();
        assert!(principal.user().is_none());
    }

    #[tokio::test]
    async fn missing_cookie_is_unauthenticated() {
        let (db, _dir) = test_db().await;
        let gate = gate_with(AuthScheme::Session, db, &["/api/v1/status/"]);

        // Exempt path admits anonymously
        let principal = gate
            .authorize("/api/v1/status/", &HeaderMap::new())
            .await
            .unwrap();
        assert!(principal.user().is_none());

        // Gated path with no credential material
        let err = gate
            .authorize("/profile", &HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn garbage_cookie_is_forbidden() {
        let (db, _dir) = test_db().await;
        let gate = gate_with(AuthScheme::Session, db, &[]);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "session_id=garbage".parse().unwrap());

        let err = gate.authorize("/profile", &headers).await.unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));
    }

    #[tokio::test]
    async fn live_session_cookie_resolves_principal() {
        let (db, _dir) = test_db().await;
        db.insert_user(NewUser {
            email: "a@b.com".to_string(),
            password_hash: "$argon2id$fake-hash".to_string(),
        })
        .await
        .unwrap();

        let sessions = SessionManager::new(db.clone());
        let sid = sessions.create_session("a@b.com").await.unwrap().unwrap();

        let gate = gate_with(AuthScheme::Session, db, &[]);
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("session_id={}", sid).parse().unwrap(),
        );

        let principal = gate.authorize("/profile", &headers).await.unwrap();
        assert_eq!(principal.user().unwrap().email, "a@b.com");
    }

    #[tokio::test]
    async fn basic_scheme_verifies_against_store() {
        let (db, _dir) = test_db().await;
        db.insert_user(NewUser {
            email: "a@b.com".to_string(),
            password_hash: hash_password("pw1").unwrap(),
        })
        .await
        .unwrap();

        let gate = gate_with(AuthScheme::Basic, db, &[]);

        // "a@b.com:pw1"
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic YUBiLmNvbTpwdzE=".parse().unwrap());
        let principal = gate.authorize("/profile", &headers).await.unwrap();
        assert_eq!(principal.user().unwrap().email, "a@b.com");

        // wrong password: present but unresolvable
        // "a@b.com:nope"
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic YUBiLmNvbTpub3Bl".parse().unwrap());
        let err = gate.authorize("/profile", &headers).await.unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));

        // absent header
        let err = gate
            .authorize("/profile", &HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }
}
