//! Credential verification seam

use async_trait::async_trait;

use crate::errors::CredentialError;

/// Identity confirmed by a successful credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub email: String,
}

/// Verifies an email/password pair
///
/// Implementations decide how passwords are stored; the orchestrator only
/// distinguishes [`CredentialError::BadCredentials`] from every other failure.
#[async_trait]
pub trait CredentialAuthenticator: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, CredentialError>;
}
