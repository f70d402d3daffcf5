//! JWT authentication middleware for protecting API endpoints.
//!
//! This middleware extracts the token from the request headers, rejects
//! revoked, invalid or refresh-kind tokens, and injects the verified claims into the
//! request as an [`AuthContext`].

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::{header::AUTHORIZATION, StatusCode},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::debug;

use inno_core::{
    domain::entities::token::Claims,
    services::{revocation::RevocationService, token::TokenService},
};
use inno_infra::SharedKeyValueStore;

use crate::dto::error::ErrorResponse;

/// Headers consulted, after `Authorization: Bearer`, for a raw token
const FALLBACK_TOKEN_HEADERS: [&str; 2] = ["token", "Auth-Token"];

/// Verified identity of the caller, passed explicitly to handlers
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Claims of the presented token
    pub claims: Claims,
    /// The raw token as presented
    pub token: String,
}

impl AuthContext {
    /// Subject (email) of the caller
    pub fn identity(&self) -> &str {
        &self.claims.sub
    }

    pub fn user_id(&self) -> i64 {
        self.claims.user_id
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    tokens: Arc<TokenService>,
    revocation: Arc<RevocationService<SharedKeyValueStore>>,
}

impl JwtAuth {
    /// Creates a new JWT authentication middleware
    pub fn new(
        tokens: Arc<TokenService>,
        revocation: Arc<RevocationService<SharedKeyValueStore>>,
    ) -> Self {
        Self { tokens, revocation }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
            revocation: self.revocation.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
    revocation: Arc<RevocationService<SharedKeyValueStore>>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let tokens = self.tokens.clone();
        let revocation = self.revocation.clone();

        Box::pin(async move {
            let token = match extract_token(req.request()) {
                Some(token) => token,
                None => return Ok(unauthorized(req, "Token de autenticación requerido")),
            };

            // Revoked tokens are rejected before signature work
            if revocation.is_revoked(&token).await {
                debug!("Rejected revoked token on {}", req.path());
                return Ok(unauthorized(req, "Token inválido o revocado"));
            }

            let claims = match tokens.verify(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    debug!("Rejected token on {}: {}", req.path(), e);
                    return Ok(unauthorized(req, "Token inválido"));
                }
            };

            // Refresh tokens are only accepted by the refresh endpoint
            if claims.is_refresh() {
                debug!("Rejected refresh token used as bearer on {}", req.path());
                return Ok(unauthorized(req, "Token inválido"));
            }

            req.extensions_mut().insert(AuthContext { claims, token });

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

fn unauthorized<B>(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
    let response = ErrorResponse::new("unauthorized", message).to_response(StatusCode::UNAUTHORIZED);
    req.into_response(response).map_into_right_body()
}

/// Extracts the token from `Authorization: Bearer`, then the `token` and
/// `Auth-Token` headers
pub fn extract_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    FALLBACK_TOKEN_HEADERS.iter().find_map(|name| {
        req.headers()
            .get(*name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
