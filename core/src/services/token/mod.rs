//! Token codec for JWT access and refresh tokens
//!
//! Tokens are signed with HS256 using a key derived from the configured
//! secret. Verification applies no clock-skew leeway.

mod config;
mod provider;
mod service;


pub use config::TokenServiceConfig;
pub use provider::TokenProvider;
pub use service::TokenService;
