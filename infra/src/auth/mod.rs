//! Credential authenticators

pub mod bcrypt_authenticator;

pub use bcrypt_authenticator::{hash_password, BcryptCredentialAuthenticator};
