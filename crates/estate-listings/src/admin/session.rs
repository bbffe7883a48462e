use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};

pub const TOKEN_BYTES: usize = 32;

/// Issued to the client after a successful login. Only the raw token leaves the server;
/// the store keeps its SHA-256 hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSession {
    pub token: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Authenticated caller handed to admin handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// A session is usable strictly before its expiry instant.
pub fn is_token_valid(session: &AdminSession, now: DateTime<Utc>) -> bool {
    now < session.expires_at
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Token is missing")]
    Missing,
    #[error("Token has expired")]
    Expired,
    #[error("Token is invalid")]
    Invalid,
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// The single configured admin account.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: [u8; 32],
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password_hash: hash_secret(password),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        let password_ok = hashes_equal(&self.password_hash, &hash_secret(password));
        password_ok && username == self.username
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
struct StoredSession {
    username: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// In-process session registry keyed by token hash.
#[derive(Debug)]
pub struct SessionStore {
    credentials: AdminCredentials,
    ttl: Duration,
    sessions: Mutex<HashMap<[u8; 32], StoredSession>>,
}

impl SessionStore {
    pub fn new(credentials: AdminCredentials, ttl: Duration) -> Self {
        Self {
            credentials,
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminSession, SessionError> {
        if !self.credentials.verify(username, password) {
            return Err(SessionError::InvalidCredentials);
        }

        let token = generate_token(&mut OsRng);
        let session = AdminSession {
            token,
            username: self.credentials.username().to_string(),
            issued_at: now,
            expires_at: now + self.ttl,
        };

        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                hash_secret(&session.token),
                StoredSession {
                    username: session.username.clone(),
                    issued_at: session.issued_at,
                    expires_at: session.expires_at,
                },
            );

        Ok(session)
    }

    /// Resolve a raw bearer token. Expired sessions are dropped on first sight.
    pub fn authenticate(
        &self,
        raw_token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionContext, SessionError> {
        if raw_token.is_empty() {
            return Err(SessionError::Missing);
        }

        let key = hash_secret(raw_token);
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let stored = sessions.get(&key).ok_or(SessionError::Invalid)?;

        let session = AdminSession {
            token: raw_token.to_string(),
            username: stored.username.clone(),
            issued_at: stored.issued_at,
            expires_at: stored.expires_at,
        };

        if !is_token_valid(&session, now) {
            sessions.remove(&key);
            return Err(SessionError::Expired);
        }

        Ok(SessionContext {
            username: session.username,
            expires_at: session.expires_at,
        })
    }

    pub fn revoke(&self, raw_token: &str) -> bool {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&hash_secret(raw_token))
            .is_some()
    }

    /// Drop every session that has expired by `now`, returning how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, stored| now < stored.expires_at);
        before - sessions.len()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// URL-safe, unpadded base64 over `TOKEN_BYTES` random bytes.
pub fn generate_token<R: RngCore>(rng: &mut R) -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

fn hash_secret(secret: &str) -> [u8; 32] {
    let digest = Sha256::digest(secret.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

fn hashes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    fn store() -> SessionStore {
        SessionStore::new(
            AdminCredentials::new("admin", "correct horse"),
            Duration::hours(12),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn token_validity_is_a_pure_time_check() {
        let session = AdminSession {
            token: "t".to_string(),
            username: "admin".to_string(),
            issued_at: now(),
            expires_at: now() + Duration::minutes(5),
        };
        assert!(is_token_valid(&session, now()));
        assert!(is_token_valid(&session, now() + Duration::seconds(299)));
        assert!(!is_token_valid(&session, now() + Duration::minutes(5)));
    }

    #[test]
    fn login_issues_session_that_authenticates() {
        let store = store();
        let session = store
            .login("admin", "correct horse", now())
            .expect("credentials accepted");
        assert_eq!(session.expires_at, now() + Duration::hours(12));

        let context = store
            .authenticate(&session.token, now() + Duration::hours(1))
            .expect("token valid");
        assert_eq!(context.username, "admin");
    }

    #[test]
    fn wrong_credentials_are_rejected() {
        let store = store();
        assert_eq!(
            store.login("admin", "wrong", now()),
            Err(SessionError::InvalidCredentials)
        );
        assert_eq!(
            store.login("root", "correct horse", now()),
            Err(SessionError::InvalidCredentials)
        );
        assert_eq!(store.active_sessions(), 0);
    }

    #[test]
    fn expired_tokens_are_reported_then_forgotten() {
        let store = store();
        let session = store
            .login("admin", "correct horse", now())
            .expect("credentials accepted");
        let later = now() + Duration::hours(13);

        assert_eq!(
            store.authenticate(&session.token, later),
            Err(SessionError::Expired)
        );
        assert_eq!(
            store.authenticate(&session.token, later),
            Err(SessionError::Invalid)
        );
    }

    #[test]
    fn revoke_and_purge() {
        let store = store();
        let first = store.login("admin", "correct horse", now()).expect("login");
        let _second = store
            .login("admin", "correct horse", now() + Duration::hours(6))
            .expect("login");

        assert!(store.revoke(&first.token));
        assert!(!store.revoke(&first.token));
        assert_eq!(store.purge_expired(now() + Duration::hours(19)), 1);
        assert_eq!(store.active_sessions(), 0);
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer("bearer   abc123 "), Some("abc123"));
        assert_eq!(parse_bearer("Basic abc123"), None);
        assert_eq!(parse_bearer("Bearer"), None);
    }

    #[test]
    fn generated_tokens_are_url_safe() {
        let mut rng = StdRng::seed_from_u64(7);
        let token = generate_token(&mut rng);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(token.len(), 43);
        assert_ne!(token, generate_token(&mut rng));
    }

    #[test]
    fn credentials_debug_output_hides_the_hash() {
        let rendered = format!("{:?}", AdminCredentials::new("admin", "secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
