//! Mapping of domain failures to HTTP responses

use actix_web::{http::StatusCode, HttpResponse};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;
use validator::ValidationErrors;

use inno_core::errors::AuthError;

use crate::dto::error::ErrorResponse;

/// Error code shared by every login and refresh rejection
pub const AUTHENTICATION_FAILED: &str = "authentication_failed";

/// Convert an [`AuthError`] into a JSON response
///
/// Every authentication failure is a 401 with the same `error` code so the
/// body does not reveal whether the account exists; the message keeps the
/// user-facing text. Storage outages are 503.
pub fn handle_auth_error(error: &AuthError) -> HttpResponse {
    debug!("Authentication rejected: {}", error.error_code());

    match error {
        AuthError::StorageUnavailable => {
            ErrorResponse::new("service_unavailable", error.to_string())
                .to_response(StatusCode::SERVICE_UNAVAILABLE)
        }
        _ => ErrorResponse::new(AUTHENTICATION_FAILED, error.to_string())
            .to_response(StatusCode::UNAUTHORIZED),
    }
}

/// 400 response listing the fields that failed validation
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let details: HashMap<String, Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes: Vec<Value> = errs.iter().map(|e| Value::from(e.code.to_string())).collect();
            (field.to_string(), Value::from(codes))
        })
        .collect();

    ErrorResponse::new("validation_error", "Datos de entrada inválidos")
        .with_details(details)
        .to_response(StatusCode::BAD_REQUEST)
}
