//! Session Module
//!
//! Holds the bearer token obtained at login. The session is an explicit
//! context object owned by the caller and lent to whatever needs an
//! authenticated request; nothing here is global.

mod store;

pub use store::{PersistedSession, SessionStore};

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::SessionConfig;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("refusing to store an empty token")]
    EmptyToken,

    #[error("session file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String wrapper that wipes its memory on drop and never prints its value.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

/// Bearer token holder with optional expiry and optional persistence.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<SecretString>,
    issued_at: Option<DateTime<Utc>>,
    max_age: Option<Duration>,
    store: Option<SessionStore>,
}

impl Session {
    /// In-memory session with no expiry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from configuration, restoring a persisted token when
    /// one exists. A corrupt or unreadable file is logged and ignored.
    pub fn from_config(config: &SessionConfig) -> Self {
        let mut session = Self::new();
        if let Some(hours) = config.max_age_hours {
            match max_age_from_hours(hours) {
                Some(max_age) => session = session.with_max_age(max_age),
                None => tracing::warn!("Ignoring out-of-range session.max_age_hours: {}", hours),
            }
        }
        if config.persist {
            session = session.with_store(SessionStore::new(config.path.clone()));
        }
        session
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Attach a store and load whatever it holds.
    pub fn with_store(mut self, store: SessionStore) -> Self {
        match store.load() {
            Ok(Some(mut persisted)) => {
                tracing::debug!("Restored session issued at {}", persisted.issued_at);
                self.token = Some(SecretString::new(std::mem::take(
                    &mut persisted.access_token,
                )));
                self.issued_at = Some(persisted.issued_at);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable session file: {}", e),
        }
        self.store = Some(store);
        self.expire_if_stale(Utc::now());
        self
    }

    /// Store a freshly issued token.
    pub fn set_token(&mut self, value: impl Into<String>) -> Result<(), SessionError> {
        self.set_token_at(value, Utc::now())
    }

    pub fn set_token_at(
        &mut self,
        value: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SessionError::EmptyToken);
        }

        self.token = Some(SecretString::new(value));
        self.issued_at = Some(issued_at);
        tracing::info!("Session token stored");

        if let (Some(store), Some(token)) = (&self.store, &self.token) {
            store.save(&PersistedSession {
                access_token: token.expose_secret().to_string(),
                issued_at,
            })?;
        }
        Ok(())
    }

    /// The current token, or `None` when unset or older than the maximum age.
    pub fn token(&self) -> Option<&str> {
        if self.is_stale(Utc::now()) {
            return None;
        }
        self.token.as_ref().map(SecretString::expose_secret)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Forget the token in memory and on disk.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.token = None;
        self.issued_at = None;
        if let Some(store) = &self.store {
            store.remove()?;
        }
        tracing::info!("Session cleared");
        Ok(())
    }

    /// Clear the session if its token has outlived the maximum age.
    /// Returns true when something was cleared.
    pub fn expire_if_stale(&mut self, now: DateTime<Utc>) -> bool {
        if self.token.is_none() || !self.is_stale(now) {
            return false;
        }
        tracing::info!("Session token expired");
        if let Err(e) = self.clear() {
            tracing::warn!("Failed to remove expired session: {}", e);
        }
        true
    }

    fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match (self.max_age, self.issued_at) {
            (Some(max_age), Some(issued_at)) => now - issued_at > max_age,
            _ => false,
        }
    }
}

/// `None` when the hour count does not fit a chrono duration.
fn max_age_from_hours(hours: u64) -> Option<Duration> {
    i64::try_from(hours).ok().and_then(Duration::try_hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.token().is_none());
        assert!(!session.is_authenticated());
        assert!(!session.is_persistent());
    }

    #[test]
    fn test_set_and_get_token() {
        let mut session = Session::new();
        session.set_token("T1").unwrap();
        assert_eq!(session.token(), Some("T1"));
        assert!(session.issued_at().is_some());

        session.set_token("T2").unwrap();
        assert_eq!(session.token(), Some("T2"));
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut session = Session::new();
        assert!(matches!(session.set_token(""), Err(SessionError::EmptyToken)));
        assert!(session.token().is_none());
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new();
        session.set_token("T1").unwrap();
        session.clear().unwrap();
        assert!(session.token().is_none());
        assert!(session.issued_at().is_none());
    }

    #[test]
    fn test_expiry() {
        let mut session = Session::new().with_max_age(Duration::hours(1));
        let issued = Utc::now() - Duration::hours(2);
        session.set_token_at("old", issued).unwrap();

        assert!(session.token().is_none());
        assert!(session.expire_if_stale(Utc::now()));
        assert!(session.issued_at().is_none());
        assert!(!session.expire_if_stale(Utc::now()));
    }

    #[test]
    fn test_fresh_token_not_expired() {
        let mut session = Session::new().with_max_age(Duration::hours(1));
        session.set_token("fresh").unwrap();
        assert!(!session.expire_if_stale(Utc::now()));
        assert_eq!(session.token(), Some("fresh"));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = SecretString::new("hunter2");
        let printed = format!("{:?}", secret);
        assert!(!printed.contains("hunter2"));

        let mut session = Session::new();
        session.set_token("hunter2").unwrap();
        assert!(!format!("{:?}", session).contains("hunter2"));
    }

    #[test]
    fn test_persisted_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::new().with_store(SessionStore::new(path.clone()));
        session.set_token("persisted").unwrap();
        assert!(path.exists());

        let restored = Session::new().with_store(SessionStore::new(path.clone()));
        assert_eq!(restored.token(), Some("persisted"));

        let mut restored = restored;
        restored.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_from_config_restores_and_expires() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        SessionStore::new(path.clone())
            .save(&PersistedSession {
                access_token: "stale".to_string(),
                issued_at: Utc::now() - Duration::hours(48),
            })
            .unwrap();

        let config = SessionConfig {
            persist: true,
            path: path.clone(),
            max_age_hours: Some(24),
        };
        let session = Session::from_config(&config);
        assert!(session.token().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_huge_max_age_means_no_expiry() {
        assert!(max_age_from_hours(3_000_000_000_000_000).is_none());
        assert!(max_age_from_hours(u64::MAX).is_none());
        assert_eq!(max_age_from_hours(24), Some(Duration::hours(24)));

        let config = SessionConfig {
            persist: false,
            max_age_hours: Some(3_000_000_000_000_000),
            ..SessionConfig::default()
        };
        let mut session = Session::from_config(&config);
        session
            .set_token_at("old", Utc::now() - Duration::days(3650))
            .unwrap();
        assert_eq!(session.token(), Some("old"));
    }

    #[test]
    fn test_from_config_without_persistence() {
        let config = SessionConfig {
            persist: false,
            ..SessionConfig::default()
        };
        let session = Session::from_config(&config);
        assert!(!session.is_persistent());
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let session = Session::new().with_store(SessionStore::new(path));
        assert!(session.token().is_none());
        assert!(session.is_persistent());
    }
}
