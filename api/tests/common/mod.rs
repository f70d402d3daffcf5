//! Shared fixture: the full application over in-memory adapters

#![allow(dead_code, unused_macros)]

use std::sync::Arc;

use actix_web::web;

use inno_api::middleware::{JwtAuth, RateLimit};
use inno_api::routes::auth::AppState;
use inno_core::{
    AuthService, RateLimitingService, RevocationService, SessionRegistry, TokenService,
    TokenServiceConfig, User, UserRole,
};
use inno_infra::auth::hash_password;
use inno_infra::{
    BcryptCredentialAuthenticator, InMemoryKeyValueStore, InMemoryUserRepository,
    SharedKeyValueStore,
};
use inno_shared::config::{BucketLimits, RateLimitConfig};

pub const PROFESSOR_EMAIL: &str = "profesor@udea.edu.co";
pub const STUDENT_EMAIL: &str = "estudiante@udea.edu.co";
pub const PASSWORD: &str = "clave-segura";

pub type TestState =
    AppState<InMemoryUserRepository, BcryptCredentialAuthenticator<InMemoryUserRepository>>;

pub struct TestStack {
    pub state: web::Data<TestState>,
    pub jwt_auth: JwtAuth,
    pub rate_limit: RateLimit,
    pub store: Arc<InMemoryKeyValueStore>,
    pub tokens: Arc<TokenService>,
}

/// Stack with rate limiting disabled
pub fn stack() -> TestStack {
    stack_with_limits(RateLimitConfig::disabled())
}

/// Stack with an auth bucket of `auth_capacity` and a general bucket of
/// `general_capacity`, neither refilling within a test run
pub fn limited_stack(general_capacity: u64, auth_capacity: u64) -> TestStack {
    stack_with_limits(RateLimitConfig {
        enabled: true,
        general: BucketLimits::new(general_capacity, 1, 3600),
        auth: BucketLimits::new(auth_capacity, 1, 3600),
    })
}

pub fn stack_with_limits(limits: RateLimitConfig) -> TestStack {
    let hash = hash_password(PASSWORD, 4).expect("hash");
    let users = Arc::new(InMemoryUserRepository::with_users([
        User::new(10, PROFESSOR_EMAIL, hash.clone(), UserRole::Professor)
            .with_name("Ana", "Gómez")
            .with_course(3),
        User::new(20, STUDENT_EMAIL, hash, UserRole::Student)
            .with_name("Juan", "Pérez")
            .with_team(7)
            .with_course(3),
    ]));

    let store = Arc::new(InMemoryKeyValueStore::new());
    let shared: SharedKeyValueStore = store.clone();

    let tokens = Arc::new(TokenService::new(TokenServiceConfig {
        jwt_secret: "api-integration-test-secret".to_string(),
        access_token_ttl_seconds: 3600,
        refresh_token_ttl_seconds: 7200,
    }));

    let auth_service = AuthService::new(
        users.clone(),
        Arc::new(BcryptCredentialAuthenticator::new(users)),
        tokens.clone(),
        RevocationService::new(Arc::new(shared.clone())),
        SessionRegistry::new(Arc::new(shared.clone()), 7200),
    );

    let general_capacity = limits.general.capacity;
    let auth_capacity = limits.auth.capacity;

    TestStack {
        state: web::Data::new(AppState::new(Arc::new(auth_service))),
        jwt_auth: JwtAuth::new(tokens.clone(), Arc::new(RevocationService::new(Arc::new(shared)))),
        rate_limit: RateLimit::new(
            Arc::new(RateLimitingService::new(limits)),
            tokens.clone(),
            general_capacity,
            auth_capacity,
        ),
        store,
        tokens,
    }
}

/// Initialize the application service for a [`TestStack`]
macro_rules! init_app {
    ($stack:expr) => {
        actix_web::test::init_service(inno_api::app::create_app(
            $stack.state.clone(),
            $stack.jwt_auth.clone(),
            $stack.rate_limit.clone(),
        ))
        .await
    };
}

/// Log in through the HTTP API and return the JSON body
macro_rules! login_json {
    ($app:expr, $email:expr, $password:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({ "email": $email, "password": $password }))
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json(&$app, req).await;
        body
    }};
}
