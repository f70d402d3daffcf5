use actix_web::{web, HttpRequest, HttpResponse};

use inno_core::domain::value_objects::LogoutResponse;
use inno_core::repositories::UserRepository;
use inno_core::services::auth::{CredentialAuthenticator, LOGOUT_INVALID_TOKEN};

use crate::middleware::auth::extract_token;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented token and ends every session of its subject.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// - 200 OK: `{ "success": true, "message": "Logout exitoso" }`
/// - 400 Bad Request: `{ "success": false, "message": "Token inválido" }` or
///   `"Error durante el logout"`
pub async fn logout<U, C>(req: HttpRequest, state: web::Data<AppState<U, C>>) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialAuthenticator + 'static,
{
    let response = match extract_token(&req) {
        Some(token) => state.auth_service.logout(&token).await,
        None => LogoutResponse::failure(LOGOUT_INVALID_TOKEN),
    };

    logout_response(response)
}

pub(crate) fn logout_response(response: LogoutResponse) -> HttpResponse {
    if response.success {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::BadRequest().json(response)
    }
}
