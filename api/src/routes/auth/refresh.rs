use actix_web::{web, HttpResponse};
use validator::Validate;

use inno_core::repositories::UserRepository;
use inno_core::services::auth::CredentialAuthenticator;

use crate::dto::auth::RefreshTokenRequest;
use crate::handlers::error::{handle_auth_error, handle_validation_errors};

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new token pair. The presented refresh
/// token is revoked on success.
///
/// # Request Body
///
/// ```json
/// { "refresh_token": "eyJ..." }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing token
/// - 401 Unauthorized: Revoked, invalid or non-refresh token, unknown user, no active session
/// - 503 Service Unavailable: Backing store down
pub async fn refresh<U, C>(
    state: web::Data<AppState<U, C>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialAuthenticator + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    match state.auth_service.refresh_token(&request.refresh_token).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_auth_error(&error),
    }
}
