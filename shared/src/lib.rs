//! Shared configuration types for the InnoSistemas server
//!
//! Every crate in the workspace reads its settings from the types defined here.

pub mod config;

pub use config::{
    AppConfig, BucketLimits, CacheBackend, CacheConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, RateLimitConfig, ServerConfig,
};
