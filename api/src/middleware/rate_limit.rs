//! Rate limiting middleware for API endpoints
//!
//! Admits or rejects each request against the token buckets of
//! [`RateLimitingService`]. Authenticated callers are keyed by token subject,
//! anonymous callers by client IP. Login, refresh and registration traffic
//! is charged to the stricter auth class.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{HeaderName, HeaderValue},
        Method, StatusCode,
    },
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};
use tracing::warn;

use inno_core::services::{rate_limit::RateLimitingService, rate_limit::TrafficClass, token::TokenService};

use super::auth::extract_token;

pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Paths never charged against a bucket
const EXEMPT_PATHS: [&str; 1] = ["/health"];

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<RateLimitingService>,
    tokens: Arc<TokenService>,
    general_capacity: u64,
    auth_capacity: u64,
}

impl RateLimit {
    /// Create the middleware
    ///
    /// `tokens` is used only to read the subject of a presented bearer token.
    pub fn new(
        limiter: Arc<RateLimitingService>,
        tokens: Arc<TokenService>,
        general_capacity: u64,
        auth_capacity: u64,
    ) -> Self {
        Self {
            limiter,
            tokens,
            general_capacity,
            auth_capacity,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    config: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            if !config.limiter.is_enabled() || EXEMPT_PATHS.contains(&req.path()) {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            let class = if is_auth_endpoint(req.path(), req.method()) {
                TrafficClass::Auth
            } else {
                TrafficClass::General
            };
            let capacity = match class {
                TrafficClass::General => config.general_capacity,
                TrafficClass::Auth => config.auth_capacity,
            };
            let key = rate_limit_key(&req, &config.tokens);

            let allowed = config.limiter.allow(&key, class, 1);
            let remaining = config.limiter.available(&key, class);

            if !allowed {
                warn!("Rate limit exceeded for {} on {}", key, req.path());
                let response = HttpResponse::build(StatusCode::TOO_MANY_REQUESTS).json(json!({
                    "error": "Too Many Requests",
                    "message": "Rate limit exceeded. Please try again later."
                }));
                let mut res = req.into_response(response).map_into_right_body();
                set_rate_limit_headers(&mut res, capacity, 0);
                return Ok(res);
            }

            let mut res = service.call(req).await?.map_into_left_body();
            set_rate_limit_headers(&mut res, capacity, remaining);
            Ok(res)
        })
    }
}

fn set_rate_limit_headers<B>(res: &mut ServiceResponse<B>, limit: u64, remaining: u64) {
    let headers = res.headers_mut();
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_LIMIT_HEADER),
        HeaderValue::from(limit),
    );
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_REMAINING_HEADER),
        HeaderValue::from(remaining),
    );
}

/// Whether the request belongs to the auth traffic class
pub fn is_auth_endpoint(path: &str, method: &Method) -> bool {
    path.contains("/auth/login")
        || path.contains("/auth/refresh")
        || path.contains("/auth/register")
        || (path.ends_with("/graphql") && *method == Method::POST)
}

/// Bucket key: `user:<subject>` for a verifiable token, else `ip:<client ip>`
pub fn rate_limit_key(req: &ServiceRequest, tokens: &TokenService) -> String {
    extract_token(req.request())
        .and_then(|token| tokens.subject(&token))
        .map(|subject| format!("user:{}", subject))
        .unwrap_or_else(|| format!("ip:{}", get_client_ip(req)))
}

/// Client IP from X-Forwarded-For (first entry), X-Real-IP, then the peer address
pub fn get_client_ip(req: &ServiceRequest) -> String {
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            let ip = ip_str.trim();
            if !ip.is_empty() {
                return ip.to_string();
            }
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_auth_endpoints() {
        assert!(is_auth_endpoint("/api/v1/auth/login", &Method::POST));
        assert!(is_auth_endpoint("/api/v1/auth/refresh", &Method::POST));
        assert!(is_auth_endpoint("/api/v1/auth/register", &Method::POST));
        assert!(is_auth_endpoint("/graphql", &Method::POST));
        assert!(!is_auth_endpoint("/graphql", &Method::GET));
        assert!(!is_auth_endpoint("/api/v1/auth/me", &Method::GET));
    }

    #[test]
    fn test_client_ip_precedence() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_srv_request();
        assert_eq!(get_client_ip(&req), "203.0.113.7");

        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_srv_request();
        assert_eq!(get_client_ip(&req), "198.51.100.2");

        let req = TestRequest::default()
            .peer_addr("192.0.2.10:5555".parse().unwrap())
            .to_srv_request();
        assert_eq!(get_client_ip(&req), "192.0.2.10");
    }

    #[test]
    fn test_blank_forwarding_headers_fall_back_to_peer() {
        let req = TestRequest::default()
            .insert_header(("X-Real-IP", ""))
            .peer_addr("192.0.2.10:5555".parse().unwrap())
            .to_srv_request();
        assert_eq!(get_client_ip(&req), "192.0.2.10");

        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", " "))
            .insert_header(("X-Real-IP", "  "))
            .peer_addr("192.0.2.11:5555".parse().unwrap())
            .to_srv_request();
        assert_eq!(get_client_ip(&req), "192.0.2.11");
    }
}
