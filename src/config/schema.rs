//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Upstream football-data provider settings.
    pub upstream: UpstreamConfig,

    /// Retry behavior for upstream calls.
    pub retry: RetryConfig,

    /// Upstream concurrency limiting.
    pub limiter: LimiterConfig,

    /// Per-client request rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Response caching.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request deadline enforced by middleware, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Upstream provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the football-data provider.
    pub base_url: String,

    /// API key sent with every upstream request, if the provider requires one.
    pub api_key: Option<String>,

    /// Header name carrying the API key.
    pub api_key_header: String,

    /// Per-attempt deadline for upstream requests, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.football.example/v4".to_string(),
            api_key: None,
            api_key_header: "x-api-key".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Retry configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum retries after the initial attempt.
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,

    /// Ceiling on the computed delay, in milliseconds.
    pub max_delay_ms: u64,

    /// Multiplicative delay growth factor.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Upstream concurrency limiter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Maximum simultaneously in-flight upstream operations.
    pub max_concurrent: usize,

    /// Spacing between an operation's completion and its slot release,
    /// in milliseconds.
    pub min_delay_ms: u64,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 5,
            min_delay_ms: 100,
        }
    }
}

/// Per-client rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable the rate limiting middleware.
    pub enabled: bool,

    /// Sustained refill rate, in requests per second per client.
    pub requests_per_second: f64,

    /// Bucket capacity (burst allowance) per client.
    pub burst: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: 10.0,
            burst: 20.0,
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable response caching.
    pub enabled: bool,

    /// Time-to-live for cached responses, in seconds.
    pub ttl_secs: u64,

    /// Interval between background sweeps of expired entries, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 60,
            sweep_interval_secs: 300,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Bind address for the metrics exposition endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
