//! End-to-end authentication flow over the in-memory infrastructure

use std::sync::Arc;

use chrono::{Duration, Utc};

use inno_core::domain::entities::user::{User, UserRole};
use inno_core::errors::AuthError;
use inno_core::services::{AuthService, RevocationService, SessionRegistry, TokenService, TokenServiceConfig};
use inno_infra::auth::bcrypt_authenticator::hash_password;
use inno_infra::{BcryptCredentialAuthenticator, InMemoryKeyValueStore, InMemoryUserRepository};

type Service = AuthService<
    InMemoryUserRepository,
    BcryptCredentialAuthenticator<InMemoryUserRepository>,
    TokenService,
    InMemoryKeyValueStore,
>;

fn build() -> (Arc<InMemoryKeyValueStore>, Service) {
    let users = Arc::new(InMemoryUserRepository::with_users([User::new(
        7,
        "profesor@udea.edu.co",
        hash_password("clave-segura", 4).unwrap(),
        UserRole::Professor,
    )
    .with_name("Ana", "Gómez")
    .with_course(3)]));
    let store = Arc::new(InMemoryKeyValueStore::new());
    let tokens = Arc::new(TokenService::new(TokenServiceConfig {
        jwt_secret: "integration-secret".to_string(),
        access_token_ttl_seconds: 900,
        refresh_token_ttl_seconds: 3600,
    }));

    let service = AuthService::new(
        users.clone(),
        Arc::new(BcryptCredentialAuthenticator::new(users)),
        tokens,
        RevocationService::new(store.clone()),
        SessionRegistry::new(store.clone(), 3600),
    );
    (store, service)
}

#[tokio::test]
async fn test_login_refresh_logout_cycle() {
    let (store, service) = build();

    let login = service.login("profesor@udea.edu.co", "clave-segura").await.unwrap();
    assert_eq!(login.user_info.role, UserRole::Professor);
    assert_eq!(store.len(), 1);

    let refreshed = service.refresh_token(&login.refresh_token).await.unwrap();
    assert_eq!(refreshed.user_info.course_id, Some(3));
    assert!(service.revocation().is_revoked(&login.refresh_token).await);

    let logout = service.logout(&refreshed.token).await;
    assert!(logout.success);
    assert_eq!(
        service.refresh_token(&refreshed.refresh_token).await.unwrap_err(),
        AuthError::NoActiveSessions
    );
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let (store, service) = build();

    let err = service.login("profesor@udea.edu.co", "otra").await.unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_clear_blacklist_restores_token() {
    let (_, service) = build();

    service
        .revocation()
        .revoke("opaque-token", Utc::now() + Duration::minutes(5))
        .await;
    assert!(service.revocation().is_revoked("opaque-token").await);

    service.revocation().clear().await;
    assert!(!service.revocation().is_revoked("opaque-token").await);
}
