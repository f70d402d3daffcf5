//! Authentication route handlers
//!
//! This module contains all authentication endpoints:
//! - Login with email and password
//! - Token refresh
//! - Logout of the presented token, or of every device
//! - Permissions of the caller

pub mod login;
pub mod logout;
pub mod logout_all;
pub mod me;
pub mod refresh;

use std::sync::Arc;

use inno_core::repositories::UserRepository;
use inno_core::services::auth::{AuthService, CredentialAuthenticator};
use inno_core::services::token::TokenService;
use inno_infra::SharedKeyValueStore;

/// Authentication service as wired by the API
pub type ApiAuthService<U, C> = AuthService<U, C, TokenService, SharedKeyValueStore>;

/// Application state that holds shared services
pub struct AppState<U, C>
where
    U: UserRepository,
    C: CredentialAuthenticator,
{
    pub auth_service: Arc<ApiAuthService<U, C>>,
}

impl<U, C> AppState<U, C>
where
    U: UserRepository,
    C: CredentialAuthenticator,
{
    pub fn new(auth_service: Arc<ApiAuthService<U, C>>) -> Self {
        Self { auth_service }
    }
}
