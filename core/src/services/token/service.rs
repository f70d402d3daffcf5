//! JWT token service implementation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::{User, UserRole};
use crate::errors::TokenError;

use super::config::TokenServiceConfig;
use super::provider::TokenProvider;

/// Service for issuing and verifying signed identity tokens
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Secret and token lifetimes
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Access token lifetime in seconds
    pub fn access_token_ttl_seconds(&self) -> i64 {
        self.config.access_token_ttl_seconds
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_token_ttl_seconds(&self) -> i64 {
        self.config.refresh_token_ttl_seconds
    }

    /// Issues an access token carrying the full identity
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Signed token expiring after the access TTL
    /// * `Err(TokenError::GenerationFailed)` - Signing failed or the TTL overflows
    pub fn issue_access_token(&self, user: &User) -> Result<String, TokenError> {
        let ttl = self.config.access_token_ttl_seconds;
        let claims = Claims::new_access_token(user, Utc::now(), ttl).map_err(|e| {
            error!("Access token TTL {}s is out of range", ttl);
            e
        })?;
        self.encode_jwt(&claims)
    }

    /// Issues a refresh token marked `type = "refresh"` without authorities
    pub fn issue_refresh_token(&self, user: &User) -> Result<String, TokenError> {
        let ttl = self.config.refresh_token_ttl_seconds;
        let claims = Claims::new_refresh_token(user, Utc::now(), ttl).map_err(|e| {
            error!("Refresh token TTL {}s is out of range", ttl);
            e
        })?;
        self.encode_jwt(&claims)
    }

    fn encode_jwt(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            error!("Failed to sign JWT: {}", e);
            TokenError::GenerationFailed
        })
    }

    /// Verifies signature, algorithm and expiry
    ///
    /// Each failure kind is logged distinctly here; callers only see a
    /// [`TokenError`] and must treat every variant as an invalid token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if token.trim().is_empty() {
            warn!("JWT claims string is empty");
            return Err(TokenError::Malformed);
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let kind = classify(e.kind());
                match kind {
                    TokenError::Expired => debug!("Expired JWT token"),
                    TokenError::BadSignature => warn!("Invalid JWT signature"),
                    TokenError::UnsupportedAlgorithm => warn!("Unsupported JWT token: {}", e),
                    _ => warn!("Invalid JWT token: {}", e),
                }
                kind
            })
    }

    /// Whether the token verifies
    pub fn validate(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    /// Best-effort read of a single claim from a valid token
    ///
    /// Returns `None` on any parse or validation failure and never logs above debug.
    pub fn extract_claim(&self, token: &str, name: &str) -> Option<Value> {
        match decode::<HashMap<String, Value>>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims.get(name).filter(|v| !v.is_null()).cloned(),
            Err(e) => {
                debug!("Could not read claim '{}' from JWT: {}", name, e);
                None
            }
        }
    }

    pub fn subject(&self, token: &str) -> Option<String> {
        self.extract_claim(token, "sub")
            .and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn user_id(&self, token: &str) -> Option<i64> {
        self.extract_claim(token, "userId").and_then(|v| v.as_i64())
    }

    pub fn role(&self, token: &str) -> Option<UserRole> {
        self.extract_claim(token, "role")
            .and_then(|v| v.as_str().and_then(|r| r.parse().ok()))
    }

    pub fn team_id(&self, token: &str) -> Option<i64> {
        self.extract_claim(token, "teamId").and_then(|v| v.as_i64())
    }

    pub fn course_id(&self, token: &str) -> Option<i64> {
        self.extract_claim(token, "courseId").and_then(|v| v.as_i64())
    }

    /// Expiration instant of a valid token
    pub fn expiration(&self, token: &str) -> Option<DateTime<Utc>> {
        self.verify(token).ok().map(|claims| claims.expires_at())
    }

    /// Whether the token is valid and of refresh kind
    pub fn is_refresh_token(&self, token: &str) -> bool {
        self.verify(token).map(|c| c.is_refresh()).unwrap_or(false)
    }

    /// Diagnostic view of the main claims of a valid token
    ///
    /// Keys: `userId`, `email`, `role`, `teamId`, `courseId`, `issuedAt`, `expiration`.
    pub fn all_claims(&self, token: &str) -> Option<HashMap<String, Value>> {
        let claims = self.verify(token).ok()?;
        let mut map = HashMap::new();
        map.insert("userId".to_string(), Value::from(claims.user_id));
        map.insert("email".to_string(), claims.email.clone().map(Value::from).unwrap_or(Value::Null));
        map.insert("role".to_string(), claims.role.clone().map(Value::from).unwrap_or(Value::Null));
        map.insert("teamId".to_string(), claims.team_id.map(Value::from).unwrap_or(Value::Null));
        map.insert("courseId".to_string(), claims.course_id.map(Value::from).unwrap_or(Value::Null));
        map.insert("issuedAt".to_string(), Value::from(claims.issued_at().to_rfc3339()));
        map.insert("expiration".to_string(), Value::from(claims.expires_at().to_rfc3339()));
        Some(map)
    }
}

impl TokenProvider for TokenService {
    fn issue_access_token(&self, user: &User) -> Result<String, TokenError> {
        TokenService::issue_access_token(self, user)
    }

    fn issue_refresh_token(&self, user: &User) -> Result<String, TokenError> {
        TokenService::issue_refresh_token(self, user)
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        TokenService::verify(self, token)
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName | ErrorKind::MissingAlgorithm => {
            TokenError::UnsupportedAlgorithm
        }
        _ => TokenError::Malformed,
    }
}
