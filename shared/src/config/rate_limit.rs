//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Token bucket parameters for one traffic class
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BucketLimits {
    /// Maximum number of tokens the bucket holds
    pub capacity: u64,

    /// Tokens added back over one refill period
    pub refill_tokens: u64,

    /// Length of the refill period in seconds
    pub refill_period_seconds: u64,
}

impl BucketLimits {
    /// Create bucket limits
    pub fn new(capacity: u64, refill_tokens: u64, refill_period_seconds: u64) -> Self {
        Self {
            capacity,
            refill_tokens,
            refill_period_seconds,
        }
    }

    /// Tokens regained per second
    pub fn refill_rate_per_second(&self) -> f64 {
        if self.refill_period_seconds == 0 {
            return self.capacity as f64;
        }
        self.refill_tokens as f64 / self.refill_period_seconds as f64
    }

    fn from_env_with_prefix(prefix: &str, defaults: Self) -> Self {
        Self {
            capacity: env_or(&format!("{}_CAPACITY", prefix), defaults.capacity),
            refill_tokens: env_or(&format!("{}_REFILL_TOKENS", prefix), defaults.refill_tokens),
            refill_period_seconds: env_or(
                &format!("{}_REFILL_PERIOD_SECONDS", prefix),
                defaults.refill_period_seconds,
            ),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Limits applied to general API traffic
    #[serde(default = "default_general")]
    pub general: BucketLimits,

    /// Limits applied to login, refresh and registration traffic
    #[serde(default = "default_auth")]
    pub auth: BucketLimits,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            general: default_general(),
            auth: default_auth(),
        }
    }
}

impl RateLimitConfig {
    /// Configuration with rate limiting turned off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            enabled: true,
            general: BucketLimits::new(1000, 1000, 60),
            auth: BucketLimits::new(100, 100, 60),
        }
    }

    /// Create a production configuration
    pub fn production() -> Self {
        Self::default()
    }

    /// Create from environment variables
    ///
    /// Reads `RATE_LIMIT_ENABLED`, `RATE_LIMIT_GENERAL_*` and `RATE_LIMIT_AUTH_*`.
    pub fn from_env() -> Self {
        Self {
            enabled: env_or("RATE_LIMIT_ENABLED", default_enabled()),
            general: BucketLimits::from_env_with_prefix("RATE_LIMIT_GENERAL", default_general()),
            auth: BucketLimits::from_env_with_prefix("RATE_LIMIT_AUTH", default_auth()),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn default_enabled() -> bool {
    true
}

fn default_general() -> BucketLimits {
    BucketLimits::new(100, 100, 60)
}

fn default_auth() -> BucketLimits {
    BucketLimits::new(10, 10, 60)
}
