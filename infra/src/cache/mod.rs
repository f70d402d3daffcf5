//! Key-value TTL stores
//!
//! Redis for deployment, an in-process map for development and tests. Both
//! implement [`inno_core::repositories::KeyValueStore`].

pub mod memory_store;
pub mod redis_client;
mod redis_store;


pub use memory_store::InMemoryKeyValueStore;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use inno_shared::CacheConfig;
