use actix_web::{web, HttpResponse};
use validator::Validate;

use inno_core::repositories::UserRepository;
use inno_core::services::auth::CredentialAuthenticator;

use crate::dto::auth::LoginRequest;
use crate::handlers::error::{handle_auth_error, handle_validation_errors};

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// # Request Body
///
/// ```json
/// { "email": "estudiante@udea.edu.co", "password": "..." }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "token": "eyJ...",
///     "refreshToken": "eyJ...",
///     "userInfo": { "id": 1, "email": "estudiante@udea.edu.co", "role": "STUDENT", ... }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed email or empty password
/// - 401 Unauthorized: Unknown user or wrong credentials
/// - 503 Service Unavailable: Backing store down
pub async fn login<U, C>(
    state: web::Data<AppState<U, C>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    C: CredentialAuthenticator + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    match state
        .auth_service
        .login(request.email.trim(), &request.password)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_auth_error(&error),
    }
}
