//! # InnoSistemas Core
//!
//! Authentication and request admission for the InnoSistemas platform.
//! This crate contains the domain entities, the token, revocation, session,
//! rate limiting and authentication services, the storage seams they depend
//! on, and the error types shared by the rest of the workspace.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{Claims, TokenKind, User, UserRole};
pub use domain::value_objects::{AuthResponse, LogoutResponse, UserInfo, UserPermissions};
pub use errors::{AuthError, CredentialError, DomainError, DomainResult, StorageError, TokenError};
pub use repositories::{KeyValueStore, UserRepository};
pub use services::{
    AuthService, CredentialAuthenticator, Principal, RateLimitingService, RevocationService,
    SessionRegistry, TokenProvider, TokenService, TokenServiceConfig, TrafficClass,
};
