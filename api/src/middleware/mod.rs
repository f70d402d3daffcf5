pub mod auth;
pub mod rate_limit;

pub use auth::{extract_token, AuthContext, JwtAuth};
pub use rate_limit::RateLimit;
