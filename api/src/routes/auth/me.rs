use actix_web::{web, HttpResponse};

use inno_core::repositories::UserRepository;
use inno_core::services::auth::CredentialAuthenticator;

use crate::handlers::error::handle_auth_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for GET /api/v1/auth/me
///
/// Returns the permissions of the authenticated caller. Requires `JwtAuth`.
pub async fn me<U, C>(state: web::Data<AppState<U, C>>, auth: AuthContext) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialAuthenticator + 'static,
{
    match state.auth_service.user_permissions(&auth.claims) {
        Ok(permissions) => HttpResponse::Ok().json(permissions),
        Err(error) => handle_auth_error(&error),
    }
}
