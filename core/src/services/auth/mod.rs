//! Authentication service module
//!
//! This module provides the authentication flow of the platform:
//! - Login with email and password
//! - Token refresh with rotation
//! - Logout of one token or every device

mod credentials;
mod service;

#[cfg(test)]
mod tests;

pub use credentials::{CredentialAuthenticator, Principal};
pub use service::{
    AuthService, LOGOUT_ALL_SUCCESS, LOGOUT_FAILED, LOGOUT_INVALID_TOKEN, LOGOUT_SUCCESS,
};
