//! Main authentication service implementation

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::User;
use crate::domain::value_objects::{AuthResponse, LogoutResponse, UserInfo, UserPermissions};
use crate::errors::{AuthError, CredentialError, TokenError};
use crate::repositories::{KeyValueStore, UserRepository};
use crate::services::digest::fingerprint;
use crate::services::revocation::RevocationService;
use crate::services::session::SessionRegistry;
use crate::services::token::TokenProvider;

use super::credentials::CredentialAuthenticator;

pub const LOGOUT_SUCCESS: &str = "Logout exitoso";
pub const LOGOUT_ALL_SUCCESS: &str = "Logout exitoso de todos los dispositivos";
pub const LOGOUT_INVALID_TOKEN: &str = "Token inválido";
pub const LOGOUT_FAILED: &str = "Error durante el logout";

/// Authentication service orchestrating login, refresh and logout
pub struct AuthService<U, C, P, S>
where
    U: UserRepository,
    C: CredentialAuthenticator,
    P: TokenProvider,
    S: KeyValueStore,
{
    /// Identity store lookups
    user_repository: Arc<U>,
    /// Password verification
    authenticator: Arc<C>,
    /// Token issuance and verification
    tokens: Arc<P>,
    /// Revoked token blacklist
    revocation: RevocationService<S>,
    /// Active sessions per identity
    sessions: SessionRegistry<S>,
}

impl<U, C, P, S> AuthService<U, C, P, S>
where
    U: UserRepository,
    C: CredentialAuthenticator,
    P: TokenProvider,
    S: KeyValueStore,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Lookup of identities by email
    /// * `authenticator` - Credential check
    /// * `tokens` - Token codec
    /// * `revocation` - Blacklist of revoked tokens
    /// * `sessions` - Registry of active sessions
    pub fn new(
        user_repository: Arc<U>,
        authenticator: Arc<C>,
        tokens: Arc<P>,
        revocation: RevocationService<S>,
        sessions: SessionRegistry<S>,
    ) -> Self {
        Self {
            user_repository,
            authenticator,
            tokens,
            revocation,
            sessions,
        }
    }

    pub fn revocation(&self) -> &RevocationService<S> {
        &self.revocation
    }

    pub fn sessions(&self) -> &SessionRegistry<S> {
        &self.sessions
    }

    /// Authenticate with email and password
    ///
    /// This method:
    /// 1. Resolves the identity by email
    /// 2. Checks the password with the credential authenticator
    /// 3. Issues an access and a refresh token
    /// 4. Registers a session for the access token (a failed write is logged, not fatal)
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Token pair and public user info
    /// * `Err(AuthError::UserNotFound)` - No identity for this email
    /// * `Err(AuthError::InvalidCredentials)` - Wrong password
    /// * `Err(AuthError::AuthenticationFailed)` - Any other failure
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        info!("Login attempt for {}", email);

        // Step 1: Resolve identity
        let user = match self.user_repository.find_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Login failed, user not found: {}", email);
                return Err(AuthError::UserNotFound);
            }
            Err(e) => {
                error!("User lookup failed for {}: {}", email, e);
                return Err(AuthError::AuthenticationFailed);
            }
        };

        // Step 2: Verify credentials
        if let Err(e) = self.authenticator.authenticate(email, password).await {
            return Err(match e {
                CredentialError::BadCredentials => {
                    warn!("Invalid credentials for {}", email);
                    AuthError::InvalidCredentials
                }
                other => {
                    error!("Authentication error for {}: {}", email, other);
                    AuthError::AuthenticationFailed
                }
            });
        }

        // Step 3: Issue tokens
        let (access_token, refresh_token) =
            self.issue_pair(&user).map_err(|_| AuthError::AuthenticationFailed)?;

        // Step 4: Register session
        if !self.sessions.register_session(&user.email, &access_token).await {
            warn!("Session for {} could not be registered", user.email);
        }

        info!("Login successful for {}", email);
        Ok(AuthResponse::new(access_token, refresh_token, UserInfo::from(&user)))
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// 1. Revoked tokens are rejected before any signature work
    /// 2. The token must verify
    /// 3. The token must be of refresh kind
    /// 4. The subject must still resolve to an identity
    /// 5. The identity must have at least one active session
    /// 6. New tokens are issued from the freshly resolved identity
    /// 7. The presented refresh token is revoked until its own expiry
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        // Step 1: Blacklist
        if self.revocation.is_revoked(refresh_token).await {
            warn!("Refresh with revoked token {}", fingerprint(refresh_token));
            return Err(AuthError::TokenRevoked);
        }

        // Step 2: Signature and expiry
        let claims = self
            .tokens
            .verify(refresh_token)
            .map_err(|_| AuthError::TokenInvalid)?;

        // Step 3: Token kind
        if !claims.is_refresh() {
            warn!("Refresh attempted with a non-refresh token for {}", claims.sub);
            return Err(AuthError::WrongTokenType);
        }

        // Step 4: Identity
        let user = match self.user_repository.find_by_email(&claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Refresh for unknown user {}", claims.sub);
                return Err(AuthError::UserNotFound);
            }
            Err(e) => {
                error!("User lookup failed during refresh for {}: {}", claims.sub, e);
                return Err(AuthError::StorageUnavailable);
            }
        };

        // Step 5: Sessions
        match self.sessions.has_active_sessions(&claims.sub).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Refresh without active sessions for {}", claims.sub);
                return Err(AuthError::NoActiveSessions);
            }
            Err(e) => {
                error!("Session lookup failed for {}: {}", claims.sub, e);
                return Err(AuthError::StorageUnavailable);
            }
        }

        // Step 6: New tokens from the current identity
        let (access_token, new_refresh_token) =
            self.issue_pair(&user).map_err(|_| AuthError::RefreshFailed)?;

        // Step 7: Rotate
        self.revocation
            .revoke(refresh_token, claims.expires_at())
            .await;

        info!("Token refreshed for {}", user.email);
        Ok(AuthResponse::new(access_token, new_refresh_token, UserInfo::from(&user)))
    }

    /// Revoke a token and end every session of its subject
    ///
    /// Never fails; the outcome is reported in the returned [`LogoutResponse`].
    pub async fn logout(&self, token: &str) -> LogoutResponse {
        let claims = match self.tokens.verify(token) {
            Ok(claims) => claims,
            Err(_) => {
                debug!("Logout with invalid token {}", fingerprint(token));
                return LogoutResponse::failure(LOGOUT_INVALID_TOKEN);
            }
        };

        self.revocation.revoke(token, claims.expires_at()).await;

        match self.sessions.invalidate_all_user_sessions(&claims.sub).await {
            Ok(count) => {
                info!("Logout for {} ended {} sessions", claims.sub, count);
                LogoutResponse::success(LOGOUT_SUCCESS)
            }
            Err(e) => {
                error!("Logout failed for {}: {}", claims.sub, e);
                LogoutResponse::failure(LOGOUT_FAILED)
            }
        }
    }

    /// End every session of `identity`
    ///
    /// Outstanding tokens are not revoked; they stop refreshing because no
    /// session remains.
    pub async fn logout_from_all_devices(&self, identity: &str) -> LogoutResponse {
        match self.sessions.invalidate_all_user_sessions(identity).await {
            Ok(count) => {
                info!("Logout from all devices for {}: {} sessions", identity, count);
                LogoutResponse::success(LOGOUT_ALL_SUCCESS)
            }
            Err(e) => {
                error!("Logout from all devices failed for {}: {}", identity, e);
                LogoutResponse::failure(LOGOUT_FAILED)
            }
        }
    }

    /// Whether the email/password pair is accepted, without issuing tokens
    pub async fn validate_credentials(&self, email: &str, password: &str) -> bool {
        match self.authenticator.authenticate(email, password).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Credential validation failed for {}: {}", email, e);
                false
            }
        }
    }

    /// Permissions of an already verified access identity
    pub fn user_permissions(&self, claims: &Claims) -> Result<UserPermissions, AuthError> {
        UserPermissions::from_claims(claims).ok_or(AuthError::TokenInvalid)
    }

    fn issue_pair(&self, user: &User) -> Result<(String, String), TokenError> {
        let access_token = self.tokens.issue_access_token(user)?;
        let refresh_token = self.tokens.issue_refresh_token(user)?;
        Ok((access_token, refresh_token))
    }
}
