//! Registry of active sessions per identity

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::errors::StorageError;
use crate::repositories::KeyValueStore;
use crate::services::digest::sha256_hex;

/// Key prefix of session entries
pub const SESSION_PREFIX: &str = "session:";

const ACTIVE_MARKER: &str = "active";

/// Tracks active sessions in a TTL store
///
/// Each session is one entry `session:<identity>:<sha256(token)>`; the number
/// of live entries under an identity is its active session count.
pub struct SessionRegistry<S: KeyValueStore> {
    store: Arc<S>,
    session_ttl_millis: u64,
}

impl<S: KeyValueStore> SessionRegistry<S> {
    /// Creates a registry whose sessions expire after `session_ttl_seconds`
    ///
    /// Non-positive lifetimes are raised to one millisecond so every write
    /// carries a TTL the store accepts.
    pub fn new(store: Arc<S>, session_ttl_seconds: i64) -> Self {
        if session_ttl_seconds <= 0 {
            warn!("Session TTL {}s is not positive; sessions expire immediately", session_ttl_seconds);
        }
        Self {
            store,
            session_ttl_millis: session_ttl_millis(session_ttl_seconds),
        }
    }

    fn identity_prefix(identity: &str) -> String {
        format!("{}{}:", SESSION_PREFIX, identity)
    }

    /// Records a new active session
    ///
    /// # Returns
    /// `false` when the store rejected the write; login treats this as non-fatal.
    pub async fn register_session(&self, identity: &str, session_token: &str) -> bool {
        let key = format!("{}{}", Self::identity_prefix(identity), sha256_hex(session_token));
        match self.store.set(&key, ACTIVE_MARKER, self.session_ttl_millis).await {
            Ok(()) => {
                debug!("Registered session for {}", identity);
                true
            }
            Err(e) => {
                error!("Failed to register session for {}: {}", identity, e);
                false
            }
        }
    }

    /// Number of live sessions for `identity`
    pub async fn active_session_count(&self, identity: &str) -> Result<u64, StorageError> {
        let keys = self
            .store
            .keys_by_prefix(&Self::identity_prefix(identity))
            .await?;
        Ok(keys.len() as u64)
    }

    /// Whether at least one session is recorded for `identity`
    pub async fn has_active_sessions(&self, identity: &str) -> Result<bool, StorageError> {
        Ok(self.active_session_count(identity).await? > 0)
    }

    /// Removes every session of `identity`
    ///
    /// # Returns
    /// * `Ok(count)` - Sessions removed, `0` for an unknown identity
    /// * `Err(StorageError)` - The store failed
    pub async fn invalidate_all_user_sessions(&self, identity: &str) -> Result<u64, StorageError> {
        let keys = self
            .store
            .keys_by_prefix(&Self::identity_prefix(identity))
            .await?;
        if keys.is_empty() {
            debug!("No sessions to invalidate for {}", identity);
            return Ok(0);
        }

        let removed = self.store.delete_many(&keys).await?;
        info!("Invalidated {} sessions for {}", removed, identity);
        Ok(removed)
    }
}

/// Session lifetime in milliseconds, never below one
fn session_ttl_millis(session_ttl_seconds: i64) -> u64 {
    (session_ttl_seconds.max(0) as u64).saturating_mul(1000).max(1)
}
