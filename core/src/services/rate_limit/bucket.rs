//! Token bucket state

use inno_shared::BucketLimits;
use tokio::time::Instant;

/// State of a single token bucket
#[derive(Debug, Clone)]
pub(crate) struct BucketState {
    tokens: f64,
    last_refill: Instant,
    limits: BucketLimits,
}

impl BucketState {
    /// A full bucket
    pub(crate) fn new(limits: BucketLimits) -> Self {
        Self {
            tokens: limits.capacity as f64,
            last_refill: Instant::now(),
            limits,
        }
    }

    fn refilled_tokens(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let refill = elapsed.as_secs_f64() * self.limits.refill_rate_per_second();
        (self.tokens + refill).min(self.limits.capacity as f64)
    }

    /// Refills, then takes `cost` tokens if that many are available
    ///
    /// The refill timestamp advances whether or not the request is admitted.
    pub(crate) fn try_acquire(&mut self, cost: u64) -> bool {
        let now = Instant::now();
        self.tokens = self.refilled_tokens(now);
        self.last_refill = now;

        let cost = cost as f64;
        if self.tokens >= cost {
            self.tokens -= cost;
            true
        } else {
            false
        }
    }

    /// Whole tokens available right now, without consuming any
    pub(crate) fn available(&self) -> u64 {
        self.refilled_tokens(Instant::now()).floor() as u64
    }

    pub(crate) fn capacity(&self) -> u64 {
        self.limits.capacity
    }

    pub(crate) fn last_refill(&self) -> Instant {
        self.last_refill
    }
}
