//! Unit tests for AuthService

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::mocks::{MockCredentialAuthenticator, MockTokenProvider};
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{AuthError, CredentialError};
use crate::repositories::{MockKeyValueStore, MockUserRepository};
use crate::services::auth::{
    AuthService, LOGOUT_ALL_SUCCESS, LOGOUT_FAILED, LOGOUT_INVALID_TOKEN, LOGOUT_SUCCESS,
};
use crate::services::revocation::RevocationService;
use crate::services::session::SessionRegistry;
use crate::services::token::TokenProvider;

const EMAIL: &str = "estudiante@udea.edu.co";
const PASSWORD: &str = "password123";

type TestAuthService =
    AuthService<MockUserRepository, MockCredentialAuthenticator, MockTokenProvider, MockKeyValueStore>;

struct Fixture {
    users: Arc<MockUserRepository>,
    authenticator: Arc<MockCredentialAuthenticator>,
    tokens: Arc<MockTokenProvider>,
    store: Arc<MockKeyValueStore>,
    service: TestAuthService,
}

fn student() -> User {
    User::new(1, EMAIL, "$2b$10$hash", UserRole::Student)
        .with_name("Juan", "Pérez")
        .with_team(1)
        .with_course(1)
}

fn fixture_with(users: MockUserRepository, authenticator: MockCredentialAuthenticator) -> Fixture {
    let users = Arc::new(users);
    let authenticator = Arc::new(authenticator);
    let tokens = Arc::new(MockTokenProvider::new());
    let store = Arc::new(MockKeyValueStore::new());

    let service = AuthService::new(
        users.clone(),
        authenticator.clone(),
        tokens.clone(),
        RevocationService::new(store.clone()),
        SessionRegistry::new(store.clone(), 7200),
    );

    Fixture {
        users,
        authenticator,
        tokens,
        store,
        service,
    }
}

fn fixture() -> Fixture {
    fixture_with(
        MockUserRepository::with_user(student()),
        MockCredentialAuthenticator::accepting(),
    )
}

#[tokio::test]
async fn test_login_success() {
    let f = fixture();

    let response = f.service.login(EMAIL, PASSWORD).await.unwrap();

    assert!(!response.token.is_empty());
    assert!(!response.refresh_token.is_empty());
    assert_eq!(response.user_info.role, UserRole::Student);
    assert_eq!(response.user_info.email, EMAIL);
    assert_eq!(response.user_info.full_name.as_deref(), Some("Juan Pérez"));
    assert_eq!(f.service.sessions().active_session_count(EMAIL).await.unwrap(), 1);

    let claims = f.tokens.verify(&response.token).unwrap();
    assert_eq!(claims.sub, EMAIL);
    assert_eq!(claims.team_id, Some(1));
    assert!(f.tokens.verify(&response.refresh_token).unwrap().is_refresh());
}

#[tokio::test]
async fn test_login_unknown_user() {
    let f = fixture_with(MockUserRepository::new(), MockCredentialAuthenticator::accepting());

    let result = f.service.login("nadie@udea.edu.co", PASSWORD).await;

    assert_eq!(result.unwrap_err(), AuthError::UserNotFound);
    assert_eq!(f.authenticator.calls(), 0);
    assert_eq!(f.tokens.issue_calls(), 0);
}

#[tokio::test]
async fn test_login_bad_credentials() {
    let f = fixture_with(
        MockUserRepository::with_user(student()),
        MockCredentialAuthenticator::rejecting(CredentialError::BadCredentials),
    );

    let err = f.service.login(EMAIL, "wrong").await.unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(err.to_string(), "Credenciales inválidas");
    assert_eq!(f.tokens.issue_calls(), 0);
    assert_eq!(f.store.len(), 0);
}

#[tokio::test]
async fn test_login_disabled_account_is_generic_failure() {
    let f = fixture_with(
        MockUserRepository::with_user(student()),
        MockCredentialAuthenticator::rejecting(CredentialError::AccountDisabled),
    );

    let err = f.service.login(EMAIL, PASSWORD).await.unwrap_err();

    assert_eq!(err, AuthError::AuthenticationFailed);
    assert_eq!(err.to_string(), "Error durante la autenticación");
}

#[tokio::test]
async fn test_login_repository_failure() {
    let f = fixture();
    f.users.set_fail(true);

    let result = f.service.login(EMAIL, PASSWORD).await;

    assert_eq!(result.unwrap_err(), AuthError::AuthenticationFailed);
}

#[tokio::test]
async fn test_login_token_issue_failure() {
    let f = fixture();
    f.tokens.set_fail_issue(true);

    let result = f.service.login(EMAIL, PASSWORD).await;

    assert_eq!(result.unwrap_err(), AuthError::AuthenticationFailed);
    assert_eq!(f.store.len(), 0);
}

#[tokio::test]
async fn test_login_survives_session_write_failure() {
    let f = fixture();
    f.store.set_fail_writes(true);

    let response = f.service.login(EMAIL, PASSWORD).await;

    assert!(response.is_ok());
    assert_eq!(f.store.len(), 0);
}

#[tokio::test]
async fn test_refresh_rotates_tokens() {
    let f = fixture();
    let login = f.service.login(EMAIL, PASSWORD).await.unwrap();

    let refreshed = f.service.refresh_token(&login.refresh_token).await.unwrap();

    assert_ne!(refreshed.token, login.token);
    assert_ne!(refreshed.refresh_token, login.refresh_token);
    assert!(f.service.revocation().is_revoked(&login.refresh_token).await);
    assert!(!f.service.revocation().is_revoked(&refreshed.refresh_token).await);

    let replay = f.service.refresh_token(&login.refresh_token).await;
    assert_eq!(replay.unwrap_err(), AuthError::TokenRevoked);
}

#[tokio::test]
async fn test_refresh_uses_current_identity() {
    let f = fixture();
    let login = f.service.login(EMAIL, PASSWORD).await.unwrap();

    let mut promoted = student();
    promoted.role = UserRole::Ta;
    f.users.replace(promoted);

    let refreshed = f.service.refresh_token(&login.refresh_token).await.unwrap();

    assert_eq!(refreshed.user_info.role, UserRole::Ta);
    let claims = f.tokens.verify(&refreshed.token).unwrap();
    assert_eq!(claims.role.as_deref(), Some("TA"));
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let f = fixture();
    let login = f.service.login(EMAIL, PASSWORD).await.unwrap();
    let lookups = f.users.find_calls();

    let err = f.service.refresh_token(&login.token).await.unwrap_err();

    assert_eq!(err, AuthError::WrongTokenType);
    assert_eq!(err.to_string(), "Token no es un refresh token");
    assert_eq!(f.users.find_calls(), lookups);
}

#[tokio::test]
async fn test_refresh_invalid_token() {
    let f = fixture();

    let err = f.service.refresh_token("not-a-jwt").await.unwrap_err();

    assert_eq!(err, AuthError::TokenInvalid);
    assert_eq!(err.to_string(), "Token inválido");
}

#[tokio::test]
async fn test_revocation_is_checked_before_verification() {
    let f = fixture();
    f.service
        .revocation()
        .revoke("not-a-jwt", Utc::now() + Duration::hours(1))
        .await;

    let err = f.service.refresh_token("not-a-jwt").await.unwrap_err();

    assert_eq!(err, AuthError::TokenRevoked);
    assert_eq!(err.to_string(), "Token inválido o revocado");
}

#[tokio::test]
async fn test_refresh_without_sessions_issues_nothing() {
    let f = fixture();
    let refresh = f.tokens.inner.issue_refresh_token(&student()).unwrap();

    let err = f.service.refresh_token(&refresh).await.unwrap_err();

    assert_eq!(err, AuthError::NoActiveSessions);
    assert_eq!(err.to_string(), "No hay sesiones activas");
    assert_eq!(f.tokens.issue_calls(), 0);
}

#[tokio::test]
async fn test_refresh_for_removed_user() {
    let f = fixture();
    let login = f.service.login(EMAIL, PASSWORD).await.unwrap();
    f.users.users.lock().unwrap().clear();

    let err = f.service.refresh_token(&login.refresh_token).await.unwrap_err();

    assert_eq!(err, AuthError::UserNotFound);
}

#[tokio::test]
async fn test_refresh_identity_store_failure() {
    let f = fixture();
    let login = f.service.login(EMAIL, PASSWORD).await.unwrap();
    f.users.set_fail(true);

    let err = f.service.refresh_token(&login.refresh_token).await.unwrap_err();

    assert_eq!(err, AuthError::StorageUnavailable);
}

#[tokio::test]
async fn test_refresh_fails_closed_when_store_unreadable() {
    let f = fixture();
    let login = f.service.login(EMAIL, PASSWORD).await.unwrap();
    f.store.set_fail_reads(true);

    let err = f.service.refresh_token(&login.refresh_token).await.unwrap_err();

    assert_eq!(err, AuthError::TokenRevoked);
}

#[tokio::test]
async fn test_refresh_issue_failure() {
    let f = fixture();
    let login = f.service.login(EMAIL, PASSWORD).await.unwrap();
    f.tokens.set_fail_issue(true);

    let err = f.service.refresh_token(&login.refresh_token).await.unwrap_err();

    assert_eq!(err, AuthError::RefreshFailed);
    assert!(!f.service.revocation().is_revoked(&login.refresh_token).await);
}

#[tokio::test]
async fn test_logout_revokes_and_ends_sessions() {
    let f = fixture();
    let login = f.service.login(EMAIL, PASSWORD).await.unwrap();

    let response = f.service.logout(&login.token).await;

    assert!(response.success);
    assert_eq!(response.message, LOGOUT_SUCCESS);
    assert!(f.service.revocation().is_revoked(&login.token).await);
    assert!(!f.service.sessions().has_active_sessions(EMAIL).await.unwrap());

    let err = f.service.refresh_token(&login.refresh_token).await.unwrap_err();
    assert_eq!(err, AuthError::NoActiveSessions);
}

#[tokio::test]
async fn test_logout_with_invalid_token() {
    let f = fixture();

    let response = f.service.logout("garbage").await;

    assert!(!response.success);
    assert_eq!(response.message, LOGOUT_INVALID_TOKEN);
}

#[tokio::test]
async fn test_logout_store_failure_is_reported() {
    let f = fixture();
    let login = f.service.login(EMAIL, PASSWORD).await.unwrap();
    f.store.set_fail_writes(true);

    let response = f.service.logout(&login.token).await;

    assert!(!response.success);
    assert_eq!(response.message, LOGOUT_FAILED);
}

#[tokio::test]
async fn test_logout_from_all_devices() {
    let f = fixture();
    f.service.login(EMAIL, PASSWORD).await.unwrap();
    f.service.login(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(f.service.sessions().active_session_count(EMAIL).await.unwrap(), 2);

    let response = f.service.logout_from_all_devices(EMAIL).await;

    assert!(response.success);
    assert_eq!(response.message, LOGOUT_ALL_SUCCESS);
    assert!(!f.service.sessions().has_active_sessions(EMAIL).await.unwrap());

    let again = f.service.logout_from_all_devices(EMAIL).await;
    assert!(again.success);
}

#[tokio::test]
async fn test_logout_from_all_devices_store_failure() {
    let f = fixture();
    f.store.set_fail_reads(true);

    let response = f.service.logout_from_all_devices(EMAIL).await;

    assert!(!response.success);
    assert_eq!(response.message, LOGOUT_FAILED);
}

#[tokio::test]
async fn test_validate_credentials() {
    let f = fixture();
    assert!(f.service.validate_credentials(EMAIL, PASSWORD).await);
    assert_eq!(f.tokens.issue_calls(), 0);

    let f = fixture_with(
        MockUserRepository::with_user(student()),
        MockCredentialAuthenticator::rejecting(CredentialError::BadCredentials),
    );
    assert!(!f.service.validate_credentials(EMAIL, "wrong").await);
}

#[tokio::test]
async fn test_user_permissions_from_claims() {
    let f = fixture();
    let login = f.service.login(EMAIL, PASSWORD).await.unwrap();

    let access = f.tokens.verify(&login.token).unwrap();
    let permissions = f.service.user_permissions(&access).unwrap();
    assert_eq!(permissions.role, UserRole::Student);
    assert!(permissions.has_permission("project:submit"));
    assert!(!permissions.can_send_notifications);

    let refresh = f.tokens.verify(&login.refresh_token).unwrap();
    assert_eq!(
        f.service.user_permissions(&refresh).unwrap_err(),
        AuthError::TokenInvalid
    );
}
