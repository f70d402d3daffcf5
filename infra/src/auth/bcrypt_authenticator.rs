//! Password check against bcrypt hashes held by the identity store

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use inno_core::errors::CredentialError;
use inno_core::repositories::UserRepository;
use inno_core::services::auth::{CredentialAuthenticator, Principal};

/// Verifies passwords with bcrypt
///
/// Unknown users and wrong passwords both answer
/// [`CredentialError::BadCredentials`].
pub struct BcryptCredentialAuthenticator<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> BcryptCredentialAuthenticator<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U: UserRepository> CredentialAuthenticator for BcryptCredentialAuthenticator<U> {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, CredentialError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| {
                error!("Identity lookup failed for {}: {}", email, e);
                CredentialError::Internal {
                    message: e.to_string(),
                }
            })?
            .ok_or(CredentialError::BadCredentials)?;

        if !user.enabled {
            warn!("Login attempt on disabled account {}", email);
            return Err(CredentialError::AccountDisabled);
        }
        if !user.account_non_locked {
            warn!("Login attempt on locked account {}", email);
            return Err(CredentialError::AccountLocked);
        }

        let password = password.to_string();
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| CredentialError::Internal {
                message: e.to_string(),
            })?
            .map_err(|e| {
                error!("Stored password hash for {} is unusable: {}", email, e);
                CredentialError::Internal {
                    message: e.to_string(),
                }
            })?;

        if matches {
            debug!("Credentials verified for {}", email);
            Ok(Principal {
                email: user.email,
            })
        } else {
            Err(CredentialError::BadCredentials)
        }
    }
}

/// bcrypt hash of `password` with the given cost (4..=31)
pub fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    bcrypt::hash(password, cost).map_err(|e| CredentialError::Internal {
        message: e.to_string(),
    })
}
