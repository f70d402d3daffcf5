//! Authentication token configuration

use serde::{Deserialize, Serialize};

/// Fallback secret used when `JWT_SECRET` is not set
const DEVELOPMENT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret used to derive the HMAC signing key
    pub secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEVELOPMENT_SECRET),
            access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry: default_refresh_token_expiry(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token lifetime in seconds
    pub fn with_access_expiry_seconds(mut self, seconds: i64) -> Self {
        self.access_token_expiry = seconds;
        self
    }

    /// Set refresh token lifetime in seconds
    pub fn with_refresh_expiry_seconds(mut self, seconds: i64) -> Self {
        self.refresh_token_expiry = seconds;
        self
    }

    /// Create from environment variables
    ///
    /// Reads `JWT_SECRET`, `JWT_ACCESS_TOKEN_EXPIRY` and `JWT_REFRESH_TOKEN_EXPIRY`.
    /// Unparseable, non-positive or over-long lifetimes fall back to the defaults.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| DEVELOPMENT_SECRET.to_string());
        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|v| parse_expiry(&v))
            .unwrap_or_else(default_access_token_expiry);
        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .ok()
            .and_then(|v| parse_expiry(&v))
            .unwrap_or_else(default_refresh_token_expiry);

        Self {
            secret,
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    /// Check if using the development secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEVELOPMENT_SECRET
    }
}

/// Longest accepted token lifetime (10 years)
const MAX_EXPIRY_SECONDS: i64 = 315_360_000;

/// Token lifetime in seconds, if positive and at most [`MAX_EXPIRY_SECONDS`]
fn parse_expiry(raw: &str) -> Option<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|seconds| (1..=MAX_EXPIRY_SECONDS).contains(seconds))
}

fn default_access_token_expiry() -> i64 {
    86400 // 24 hours
}

fn default_refresh_token_expiry() -> i64 {
    604800 // 7 days
}
