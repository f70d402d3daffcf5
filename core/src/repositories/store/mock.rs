//! Mock implementation of KeyValueStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::errors::StorageError;

use super::trait_::KeyValueStore;

/// In-memory store honouring TTLs against the (pausable) tokio clock
///
/// `fail_reads` breaks `exists`/`keys_by_prefix`, `fail_writes` breaks
/// `set`/`delete`/`delete_many`.
#[derive(Default)]
pub struct MockKeyValueStore {
    pub entries: Mutex<HashMap<String, (String, Instant)>>,
    pub set_calls: AtomicUsize,
    pub last_ttl_millis: Mutex<Option<u64>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl MockKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::new();
        store.set_fail_reads(true);
        store.set_fail_writes(true);
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn last_ttl_millis(&self) -> Option<u64> {
        *self.last_ttl_millis.lock().unwrap()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    fn read_guard(&self) -> Result<(), StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable {
                message: "Redis connection failed".to_string(),
            });
        }
        Ok(())
    }

    fn write_guard(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable {
                message: "Redis connection failed".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MockKeyValueStore {
    async fn set(&self, key: &str, value: &str, ttl_millis: u64) -> Result<(), StorageError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.write_guard()?;
        *self.last_ttl_millis.lock().unwrap() = Some(ttl_millis);
        let expires_at = Instant::now() + Duration::from_millis(ttl_millis);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.read_guard()?;
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, expires_at)| *expires_at > now)
            .unwrap_or(false))
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        self.write_guard()?;
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        self.read_guard()?;
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, (_, expires_at))| key.starts_with(prefix) && *expires_at > now)
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, StorageError> {
        self.write_guard()?;
        let mut entries = self.entries.lock().unwrap();
        Ok(keys.iter().filter(|k| entries.remove(*k).is_some()).count() as u64)
    }
}
