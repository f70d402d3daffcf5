//! Business services containing domain logic and use cases.

pub mod auth;
pub(crate) mod digest;
pub mod rate_limit;
pub mod revocation;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, CredentialAuthenticator, Principal};
pub use rate_limit::{RateLimitingService, TrafficClass};
pub use revocation::RevocationService;
pub use session::SessionRegistry;
pub use token::{TokenProvider, TokenService, TokenServiceConfig};
