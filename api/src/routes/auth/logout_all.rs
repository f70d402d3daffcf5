use actix_web::{web, HttpResponse};

use inno_core::repositories::UserRepository;
use inno_core::services::auth::CredentialAuthenticator;

use crate::middleware::auth::AuthContext;

use super::logout::logout_response;
use super::AppState;

/// Handler for POST /api/v1/auth/logout-all
///
/// Ends every session of the authenticated caller. Requires `JwtAuth`.
pub async fn logout_all<U, C>(state: web::Data<AppState<U, C>>, auth: AuthContext) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialAuthenticator + 'static,
{
    let response = state
        .auth_service
        .logout_from_all_devices(auth.identity())
        .await;

    logout_response(response)
}
