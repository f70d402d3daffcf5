//! Rate limiting service keyed by client and traffic class

use std::fmt;
use std::time::Duration;

use dashmap::DashMap;
use inno_shared::{BucketLimits, RateLimitConfig};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::bucket::BucketState;

/// Traffic class a request is charged against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficClass {
    /// Regular API traffic
    General,
    /// Login, refresh and registration traffic
    Auth,
}

impl fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficClass::General => f.write_str("general"),
            TrafficClass::Auth => f.write_str("auth"),
        }
    }
}

/// Token bucket rate limiter
///
/// Every `(key, class)` pair owns an independent bucket, created full on
/// first use. Buckets live as long as the service or until [`reset`],
/// [`clear_all`] or [`evict_idle`] removes them.
///
/// [`reset`]: RateLimitingService::reset
/// [`clear_all`]: RateLimitingService::clear_all
/// [`evict_idle`]: RateLimitingService::evict_idle
pub struct RateLimitingService {
    config: RateLimitConfig,
    buckets: DashMap<(String, TrafficClass), BucketState>,
}

impl RateLimitingService {
    pub fn new(config: RateLimitConfig) -> Self {
        if config.enabled {
            info!(
                "Rate limiting enabled (general: {}/{}s, auth: {}/{}s)",
                config.general.capacity,
                config.general.refill_period_seconds,
                config.auth.capacity,
                config.auth.refill_period_seconds
            );
        } else {
            warn!("Rate limiting is disabled");
        }

        Self {
            config,
            buckets: DashMap::new(),
        }
    }

    fn limits(&self, class: TrafficClass) -> BucketLimits {
        match class {
            TrafficClass::General => self.config.general,
            TrafficClass::Auth => self.config.auth,
        }
    }

    /// Charges `cost` tokens to the bucket of `(key, class)`
    pub fn allow(&self, key: &str, class: TrafficClass, cost: u64) -> bool {
        if !self.config.enabled {
            return true;
        }

        let limits = self.limits(class);
        let allowed = self
            .buckets
            .entry((key.to_string(), class))
            .or_insert_with(|| BucketState::new(limits))
            .try_acquire(cost);

        if !allowed {
            debug!("Rate limit exceeded for key {} ({})", key, class);
        }
        allowed
    }

    /// Charges one token of general traffic
    pub fn allow_request(&self, key: &str) -> bool {
        self.allow(key, TrafficClass::General, 1)
    }

    /// Charges one token of auth traffic
    pub fn allow_auth_request(&self, key: &str) -> bool {
        self.allow(key, TrafficClass::Auth, 1)
    }

    /// Charges `cost` tokens of general traffic
    pub fn allow_request_with_cost(&self, key: &str, cost: u64) -> bool {
        self.allow(key, TrafficClass::General, cost)
    }

    /// Whole tokens left for `(key, class)`; capacity for unseen keys
    pub fn available(&self, key: &str, class: TrafficClass) -> u64 {
        self.buckets
            .get(&(key.to_string(), class))
            .map(|bucket| bucket.available())
            .unwrap_or_else(|| self.limits(class).capacity)
    }

    pub fn available_tokens(&self, key: &str) -> u64 {
        self.available(key, TrafficClass::General)
    }

    pub fn available_auth_tokens(&self, key: &str) -> u64 {
        self.available(key, TrafficClass::Auth)
    }

    /// Forgets both buckets of `key`
    pub fn reset(&self, key: &str) {
        if key.is_empty() {
            return;
        }
        self.buckets.remove(&(key.to_string(), TrafficClass::General));
        self.buckets.remove(&(key.to_string(), TrafficClass::Auth));
        debug!("Rate limit reset for key {}", key);
    }

    /// Forgets every bucket
    pub fn clear_all(&self) {
        let count = self.buckets.len();
        self.buckets.clear();
        info!("Cleared {} rate limit buckets", count);
    }

    /// Human-readable summary of the general bucket of `key`
    pub fn stats(&self, key: &str) -> String {
        let bucket = if key.is_empty() {
            None
        } else {
            self.buckets.get(&(key.to_string(), TrafficClass::General))
        };

        match bucket {
            Some(bucket) => format!(
                "Key: {}, Tokens remaining: {}, Capacity: {}",
                key,
                bucket.available(),
                bucket.capacity()
            ),
            None => format!("No data for key: {}", key),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Number of live buckets
    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }

    /// Drops buckets that have not been touched for at least `max_idle`
    ///
    /// # Returns
    /// Number of buckets removed
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_refill()) < max_idle);
        let evicted = before.saturating_sub(self.buckets.len());
        if evicted > 0 {
            info!("Evicted {} idle rate limit buckets", evicted);
        }
        evicted
    }
}

impl Default for RateLimitingService {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
