//! KeyValueStore backed by Redis

use async_trait::async_trait;

use inno_core::errors::StorageError;
use inno_core::repositories::KeyValueStore;

use super::redis_client::RedisClient;

#[async_trait]
impl KeyValueStore for RedisClient {
    async fn set(&self, key: &str, value: &str, ttl_millis: u64) -> Result<(), StorageError> {
        self.set_with_expiry_millis(key, value, ttl_millis)
            .await
            .map_err(Into::into)
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        RedisClient::exists(self, key).await.map_err(Into::into)
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        RedisClient::delete(self, key).await.map_err(Into::into)
    }

    async fn keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        RedisClient::keys_by_prefix(self, prefix).await.map_err(Into::into)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, StorageError> {
        RedisClient::delete_many(self, keys).await.map_err(Into::into)
    }
}
