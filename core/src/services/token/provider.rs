//! Token issuing and verification contract used by the authentication service

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::User;
use crate::errors::TokenError;

/// Issues and verifies identity tokens
///
/// [`super::TokenService`] is the JWT implementation. The authentication
/// service depends on this trait so that issuance is observable in tests.
pub trait TokenProvider: Send + Sync {
    /// Issue an access token for a resolved identity
    fn issue_access_token(&self, user: &User) -> Result<String, TokenError>;

    /// Issue a refresh token for a resolved identity
    fn issue_refresh_token(&self, user: &User) -> Result<String, TokenError>;

    /// Verify signature, algorithm and expiry, returning the claims
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}
