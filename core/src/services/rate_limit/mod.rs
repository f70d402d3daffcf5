//! Token bucket rate limiting

mod bucket;
mod service;


pub use service::{RateLimitingService, TrafficClass};
