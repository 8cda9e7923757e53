//! Admin session primitives
//!
//! Pure functions and an in-process session set; no HTTP framework
//! dependencies. The web module wraps these with axum middleware.
//!
//! Login exchanges the admin password (stored in the settings table) for a
//! bearer token: 32 random bytes run through SHA-256, held in memory with
//! an expiry. Sessions do not survive a restart, which is acceptable for a
//! single-admin tool - the DJ just logs in again.

use crate::db::get_setting;
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Mutex;

/// Default session lifetime when the setting is absent or unparsable
const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

/// Generate a random admin password for first-run deployments
pub fn generate_password() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..12)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}

/// Mint an opaque session token: 32 random bytes, SHA-256, 64 hex chars
fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Check a login attempt against the stored admin password
pub async fn verify_password(pool: &SqlitePool, provided: &str) -> Result<bool> {
    let stored = get_setting(pool, "admin_password")
        .await?
        .ok_or_else(|| Error::Config("admin_password setting missing".to_string()))?;
    Ok(stored == provided)
}

/// Read the configured session lifetime
pub async fn session_ttl(pool: &SqlitePool) -> Duration {
    let hours = match get_setting(pool, "session_ttl_hours").await {
        Ok(Some(value)) => value.parse::<i64>().unwrap_or(DEFAULT_SESSION_TTL_HOURS),
        _ => DEFAULT_SESSION_TTL_HOURS,
    };
    Duration::hours(hours)
}

/// In-process set of live admin sessions
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session and return its token
    pub fn create(&self, ttl: Duration) -> String {
        let token = generate_token();
        let expires_at = Utc::now() + ttl;
        self.sessions
            .lock()
            .expect("session lock poisoned")
            .insert(token.clone(), expires_at);
        token
    }

    /// Whether a token corresponds to a live, unexpired session.
    ///
    /// Expired entries are removed on the way out.
    pub fn validate(&self, token: &str) -> bool {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        match sessions.get(token) {
            Some(expires_at) if *expires_at > Utc::now() => true,
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    /// Revoke a session; unknown tokens are a no-op
    pub fn revoke(&self, token: &str) {
        self.sessions
            .lock()
            .expect("session lock poisoned")
            .remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_session_validates_until_revoked() {
        let store = SessionStore::new();
        let token = store.create(Duration::hours(1));

        assert!(store.validate(&token));
        store.revoke(&token);
        assert!(!store.validate(&token));
    }

    #[test]
    fn expired_session_is_rejected_and_removed() {
        let store = SessionStore::new();
        let token = store.create(Duration::milliseconds(-1));

        assert!(!store.validate(&token));
        // Second check hits the removed-entry path
        assert!(!store.validate(&token));
    }

    #[test]
    fn unknown_token_is_rejected() {
        let store = SessionStore::new();
        assert!(!store.validate("not-a-token"));
    }

    #[test]
    fn tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn password_verification_reads_settings() {
        let pool = crate::db::init_memory_database().await.unwrap();
        sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES ('admin_password', 'hunter2')")
            .execute(&pool)
            .await
            .unwrap();

        assert!(verify_password(&pool, "hunter2").await.unwrap());
        assert!(!verify_password(&pool, "wrong").await.unwrap());
    }
}
