//! Auth token storage.
//!
//! Drive uploads authenticate with an opaque bearer token. The token is
//! cached on disk together with a soft expiration: a client-tracked
//! timestamp after which the token is proactively re-requested through a
//! [`TokenProvider`], independent of server-side validity.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Safety margin subtracted from the expiration when judging freshness.
const DEFAULT_MARGIN: Duration = Duration::from_secs(60);

// ============================================================================
// TokenProvider
// ============================================================================

/// A freshly granted token with its lifetime.
#[derive(Debug, Clone)]
pub struct GrantedToken {
    /// Opaque bearer token.
    pub token: String,
    /// Lifetime reported by the grant.
    pub expires_in: Duration,
}

/// Source of fresh tokens, consulted when the cache misses or expires.
///
/// Implementations typically run an interactive grant (OS account
/// picker, OAuth consent).
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Obtains a fresh token.
    async fn grant(&self) -> Result<GrantedToken>;
}

// ============================================================================
// StoredToken
// ============================================================================

/// On-disk token record.
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    /// Opaque bearer token.
    token: String,
    /// Unix timestamp (seconds) the token expires at.
    expires_at: u64,
}

// ============================================================================
// TokenStore
// ============================================================================

/// Disk-backed token cache with soft expiration.
pub struct TokenStore {
    /// Path of the JSON token record.
    path: PathBuf,
    /// Safety margin for the soft expiration.
    margin: Duration,
}

impl TokenStore {
    /// Creates a store at the given path with the default margin.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            margin: DEFAULT_MARGIN,
        }
    }

    /// Overrides the soft-expiration safety margin.
    #[must_use]
    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    /// Returns a valid token, re-requesting through the provider when the
    /// cache is missing or soft-expired.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthFailed`] when the provider denies or fails
    /// the grant.
    pub async fn token(&self, provider: &dyn TokenProvider) -> Result<String> {
        if let Some(cached) = self.load_fresh() {
            debug!("Using cached token");
            return Ok(cached);
        }

        debug!("Requesting fresh token");
        let granted = provider
            .grant()
            .await
            .map_err(|e| Error::auth_failed(e.to_string()))?;

        self.persist(&granted)?;
        Ok(granted.token)
    }

    /// Removes the cached token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the record exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads the cached token if present and not soft-expired.
    fn load_fresh(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let stored: StoredToken = serde_json::from_str(&raw).ok()?;

        let now = unix_now();
        if now + self.margin.as_secs() >= stored.expires_at {
            debug!("Cached token soft-expired");
            return None;
        }

        Some(stored.token)
    }

    /// Persists a freshly granted token.
    fn persist(&self, granted: &GrantedToken) -> Result<()> {
        let stored = StoredToken {
            token: granted.token.clone(),
            expires_at: unix_now() + granted.expires_in.as_secs(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }
}

/// Current unix time in seconds.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedProvider {
        calls: AtomicU32,
        fail: bool,
    }

    impl FixedProvider {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenProvider for FixedProvider {
        async fn grant(&self) -> Result<GrantedToken> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::auth_failed("user declined"));
            }
            Ok(GrantedToken {
                token: "tok-abc".to_string(),
                expires_in: Duration::from_secs(3600),
            })
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> TokenStore {
        TokenStore::new(dir.path().join("token.json"))
    }

    #[tokio::test]
    async fn test_fresh_grant_is_cached() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let provider = FixedProvider::new(false);

        let first = store.token(&provider).await.expect("grant");
        let second = store.token(&provider).await.expect("cached");

        assert_eq!(first, "tok-abc");
        assert_eq!(second, "tok-abc");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_soft_expired_token_is_refreshed() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A margin larger than the lifetime makes every cached token stale
        let store = store_in(&dir).with_margin(Duration::from_secs(7200));
        let provider = FixedProvider::new(false);

        store.token(&provider).await.expect("grant");
        store.token(&provider).await.expect("refresh");

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_auth_failed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let provider = FixedProvider::new(true);

        let err = store.token(&provider).await.unwrap_err();
        assert!(matches!(err, Error::AuthFailed { .. }));
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let provider = FixedProvider::new(false);

        store.token(&provider).await.expect("grant");
        store.clear().expect("clear");
        store.clear().expect("clear again");

        store.token(&provider).await.expect("re-grant");
        assert_eq!(provider.calls(), 2);
    }
}
