//! Revocation (blacklist) of tokens until their natural expiry

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::repositories::KeyValueStore;
use crate::services::digest::fingerprint;

/// Key prefix of revocation entries
pub const BLACKLIST_PREFIX: &str = "token:blacklist:";

const REVOKED_MARKER: &str = "revoked";

/// Tracks revoked tokens in a TTL store
///
/// Writes fail open: a failed `revoke` is logged and swallowed.
/// Reads fail closed: `is_revoked` answers `true` when the store cannot be read.
pub struct RevocationService<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> RevocationService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn key(token: &str) -> String {
        format!("{}{}", BLACKLIST_PREFIX, token)
    }

    /// Revokes `token` until `expires_at`
    ///
    /// Tokens that are already expired are not recorded, so no write happens.
    /// The entry's TTL is the token's remaining lifetime in milliseconds.
    pub async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) {
        if token.is_empty() {
            warn!("Attempted to revoke an empty token");
            return;
        }

        let remaining = expires_at.signed_duration_since(Utc::now()).num_milliseconds();
        if remaining <= 0 {
            debug!("Token {} already expired, nothing to revoke", fingerprint(token));
            return;
        }

        match self
            .store
            .set(&Self::key(token), REVOKED_MARKER, remaining as u64)
            .await
        {
            Ok(()) => info!(
                "Token {} revoked for {}ms",
                fingerprint(token),
                remaining
            ),
            Err(e) => error!("Failed to revoke token {}: {}", fingerprint(token), e),
        }
    }

    /// Whether `token` is revoked; `true` when the store cannot be read
    pub async fn is_revoked(&self, token: &str) -> bool {
        match self.store.exists(&Self::key(token)).await {
            Ok(revoked) => revoked,
            Err(e) => {
                error!(
                    "Could not check revocation of token {}, denying: {}",
                    fingerprint(token),
                    e
                );
                true
            }
        }
    }

    /// Removes a revocation entry; removing an absent entry is not an error
    pub async fn unrevoke(&self, token: &str) {
        match self.store.delete(&Self::key(token)).await {
            Ok(true) => info!("Token {} removed from blacklist", fingerprint(token)),
            Ok(false) => debug!("Token {} was not blacklisted", fingerprint(token)),
            Err(e) => error!(
                "Failed to remove token {} from blacklist: {}",
                fingerprint(token),
                e
            ),
        }
    }

    /// Removes every revocation entry
    pub async fn clear(&self) {
        let keys = match self.store.keys_by_prefix(BLACKLIST_PREFIX).await {
            Ok(keys) => keys,
            Err(e) => {
                error!("Failed to list blacklist entries: {}", e);
                return;
            }
        };

        if keys.is_empty() {
            debug!("Blacklist already empty");
            return;
        }

        match self.store.delete_many(&keys).await {
            Ok(removed) => info!("Cleared {} blacklist entries", removed),
            Err(e) => error!("Failed to clear blacklist: {}", e),
        }
    }
}
