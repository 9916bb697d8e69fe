//! Per-client request rate limiting middleware.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::config::RateLimitConfig;
use crate::observability::metrics;

/// A simple token bucket rate limiter.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Shared state for the rate limiter, one bucket per client.
pub struct RateLimiterState {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    refill_rate: f64,
    burst: f64,
}

impl RateLimiterState {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            refill_rate: config.requests_per_second,
            burst: config.burst,
        }
    }

    /// Check whether `key` may make another request right now.
    pub fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().expect("rate limiter mutex poisoned");
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.burst));

        bucket.try_acquire(self.burst, self.refill_rate)
    }
}

/// Middleware function keyed on client IP.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = addr.ip().to_string();

    if state.check(&key) {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, "Rate limit exceeded");
        metrics::record_rate_limited();
        let mut response = Response::new(Body::from("Rate limit exceeded"));
        *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
        response
    }
}
