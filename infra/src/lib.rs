//! # Infrastructure Layer
//!
//! Concrete implementations of the storage and credential seams declared in
//! `inno_core`:
//!
//! - **Cache**: Redis client and an in-memory map, both usable as the
//!   key-value TTL store behind token revocation and session tracking
//! - **Repositories**: in-memory identity store
//! - **Auth**: bcrypt credential authenticator

use std::sync::Arc;

use inno_core::errors::StorageError;
use inno_core::repositories::KeyValueStore;
use inno_shared::{CacheBackend, CacheConfig};

/// Auth module - credential authenticators
pub mod auth;

/// Cache module - Redis client and TTL stores
pub mod cache;

/// Repositories module - identity stores
pub mod repositories;

pub use auth::BcryptCredentialAuthenticator;
pub use cache::{InMemoryKeyValueStore, RedisClient};
pub use repositories::InMemoryUserRepository;

/// Shared handle to whichever TTL store was configured
pub type SharedKeyValueStore = Arc<dyn KeyValueStore>;

/// Build the key-value store selected by `config.backend`
pub async fn create_key_value_store(
    config: &CacheConfig,
) -> Result<SharedKeyValueStore, InfrastructureError> {
    match config.backend {
        CacheBackend::Redis => {
            let client = RedisClient::new(config).await?;
            Ok(Arc::new(client))
        }
        CacheBackend::Memory => {
            tracing::warn!("Using in-memory key-value store; revocations are lost on restart");
            Ok(Arc::new(InMemoryKeyValueStore::new()))
        }
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for StorageError {
    fn from(err: InfrastructureError) -> Self {
        match &err {
            InfrastructureError::Cache(e)
                if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() =>
            {
                StorageError::Unavailable {
                    message: err.to_string(),
                }
            }
            _ => StorageError::Operation {
                message: err.to_string(),
            },
        }
    }
}
