//! Application factory
//!
//! Builds the Actix-web application from already constructed services so the
//! binary and the integration tests wire routes and middleware identically.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error, HttpResponse,
};

use inno_core::repositories::UserRepository;
use inno_core::services::auth::CredentialAuthenticator;

use crate::middleware::{auth::JwtAuth, rate_limit::RateLimit};
use crate::routes::auth::{
    login::login, logout::logout, logout_all::logout_all, me::me, refresh::refresh, AppState,
};

/// Create and configure the application with all dependencies
pub fn create_app<U, C>(
    app_state: web::Data<AppState<U, C>>,
    jwt_auth: JwtAuth,
    rate_limit: RateLimit,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    C: CredentialAuthenticator + 'static,
{
    App::new()
        // Add application state
        .app_data(app_state)
        // Middleware order: logging outermost, then rate limiting
        .wrap(rate_limit)
        .wrap(Logger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::<U, C>))
                    .route("/refresh", web::post().to(refresh::<U, C>))
                    .route("/logout", web::post().to(logout::<U, C>))
                    .service(
                        web::resource("/logout-all")
                            .wrap(jwt_auth.clone())
                            .route(web::post().to(logout_all::<U, C>)),
                    )
                    .service(
                        web::resource("/me")
                            .wrap(jwt_auth)
                            .route(web::get().to(me::<U, C>)),
                    ),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "inno-auth-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
