//! Error types for token handling, authentication and storage access
//!
//! Authentication messages are the fixed, user-facing Spanish strings returned
//! by the public API. Lower-level failures are converted into one of these
//! kinds at each component boundary.

use thiserror::Error;

/// Token codec errors
///
/// Callers treat every variant as "invalid token"; the distinction exists for logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token expired")]
    Expired,

    #[error("Unsupported token algorithm")]
    UnsupportedAlgorithm,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Authentication orchestrator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Usuario no encontrado")]
    UserNotFound,

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Error durante la autenticación")]
    AuthenticationFailed,

    #[error("Token inválido o revocado")]
    TokenRevoked,

    #[error("Token inválido")]
    TokenInvalid,

    #[error("Token no es un refresh token")]
    WrongTokenType,

    #[error("No hay sesiones activas")]
    NoActiveSessions,

    #[error("Error al renovar el token")]
    RefreshFailed,

    #[error("Servicio de almacenamiento no disponible")]
    StorageUnavailable,
}

impl AuthError {
    /// Stable machine-readable code used in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            AuthError::TokenRevoked => "TOKEN_REVOKED",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::WrongTokenType => "WRONG_TOKEN_TYPE",
            AuthError::NoActiveSessions => "NO_ACTIVE_SESSIONS",
            AuthError::RefreshFailed => "REFRESH_FAILED",
            AuthError::StorageUnavailable => "STORAGE_UNAVAILABLE",
        }
    }
}

/// Key-value store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("Storage operation failed: {message}")]
    Operation { message: String },
}

/// Credential check errors reported by a credential authenticator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Bad credentials")]
    BadCredentials,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Account locked")]
    AccountLocked,

    #[error("Credential check failed: {message}")]
    Internal { message: String },
}
