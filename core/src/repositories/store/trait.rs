//! TTL-capable key-value store contract backing revocation and session records.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::StorageError;

/// Key-value store with per-key expiry
///
/// Every call is an independent round trip. Implementations report
/// connection and command failures as [`StorageError`]; callers decide
/// whether a failure opens or closes.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl_millis` milliseconds
    async fn set(&self, key: &str, value: &str, ttl_millis: u64) -> Result<(), StorageError>;

    /// Whether a live (unexpired) entry exists for `key`
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Remove `key`; returns whether an entry was removed
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// All live keys starting with `prefix`
    async fn keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Remove every key in `keys`; returns how many were removed
    async fn delete_many(&self, keys: &[String]) -> Result<u64, StorageError>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn set(&self, key: &str, value: &str, ttl_millis: u64) -> Result<(), StorageError> {
        (**self).set(key, value, ttl_millis).await
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        (**self).exists(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        (**self).delete(key).await
    }

    async fn keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        (**self).keys_by_prefix(prefix).await
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, StorageError> {
        (**self).delete_many(keys).await
    }
}
