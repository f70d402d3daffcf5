use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::{anyhow, Context};
use tracing::{info, warn};

use inno_api::{
    app::create_app,
    logging,
    middleware::{JwtAuth, RateLimit},
    routes::auth::AppState,
};
use inno_core::{
    AuthService, RateLimitingService, RevocationService, SessionRegistry, TokenService,
    TokenServiceConfig, User, UserRole,
};
use inno_infra::{
    auth::hash_password, create_key_value_store, BcryptCredentialAuthenticator,
    InMemoryUserRepository,
};
use inno_shared::AppConfig;

/// bcrypt cost of the seeded development accounts
const DEMO_PASSWORD_COST: u32 = 10;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| anyhow!(e))?;
    logging::init(&config.logging, config.environment)?;

    info!("Starting InnoSistemas auth API");

    if config.jwt.is_using_default_secret() {
        if config.environment.is_production() {
            return Err(anyhow!("JWT_SECRET must be set in production"));
        }
        warn!("JWT_SECRET not set; using the development signing secret");
    }

    let store = create_key_value_store(&config.cache)
        .await
        .context("failed to initialize the key-value store")?;

    let users = Arc::new(InMemoryUserRepository::new());
    if config.environment.is_development() {
        seed_demo_users(&users)?;
    }

    let tokens = Arc::new(TokenService::new(TokenServiceConfig::from(&config.jwt)));
    let rate_limiter = Arc::new(RateLimitingService::new(config.rate_limit.clone()));
    let authenticator = Arc::new(BcryptCredentialAuthenticator::new(users.clone()));

    let auth_service = AuthService::new(
        users,
        authenticator,
        tokens.clone(),
        RevocationService::new(Arc::new(store.clone())),
        SessionRegistry::new(Arc::new(store.clone()), config.jwt.refresh_token_expiry),
    );
    let app_state = web::Data::new(AppState::new(Arc::new(auth_service)));

    let jwt_auth = JwtAuth::new(
        tokens.clone(),
        Arc::new(RevocationService::new(Arc::new(store))),
    );
    let rate_limit = RateLimit::new(
        rate_limiter,
        tokens,
        config.rate_limit.general.capacity,
        config.rate_limit.auth.capacity,
    );

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        create_app(app_state.clone(), jwt_auth.clone(), rate_limit.clone())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server terminated with an error")
}

/// Development accounts, one per role, sharing `DEMO_USER_PASSWORD` (default "password123")
fn seed_demo_users(users: &InMemoryUserRepository) -> anyhow::Result<()> {
    let password =
        std::env::var("DEMO_USER_PASSWORD").unwrap_or_else(|_| String::from("password123"));
    let hash = hash_password(&password, DEMO_PASSWORD_COST)?;

    let accounts = [
        (1, "admin@udea.edu.co", UserRole::Admin, "Admin", "Sistema"),
        (2, "profesor@udea.edu.co", UserRole::Professor, "Carlos", "Rodríguez"),
        (3, "monitor@udea.edu.co", UserRole::Ta, "Laura", "Gómez"),
        (4, "estudiante@udea.edu.co", UserRole::Student, "Juan", "Pérez"),
    ];
    for (id, email, role, first, last) in accounts {
        let mut user = User::new(id, email, hash.clone(), role).with_name(first, last);
        if role != UserRole::Admin {
            user = user.with_course(1);
        }
        if role == UserRole::Student {
            user = user.with_team(1);
        }
        users.upsert(user);
    }

    warn!("Seeded {} demo users for development", accounts.len());
    Ok(())
}
