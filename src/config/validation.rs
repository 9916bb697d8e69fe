//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delays ordered, limits > 0)
//! - Check the upstream URL and bind addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    BindAddress(String),

    #[error("observability.metrics_address '{0}' is not a valid socket address")]
    MetricsAddress(String),

    #[error("upstream.base_url '{0}' is not a valid URL")]
    BaseUrl(String),

    #[error("retry.backoff_multiplier must be >= 1.0 (got {0})")]
    BackoffMultiplier(f64),

    #[error("retry.initial_delay_ms ({0}) exceeds retry.max_delay_ms ({1})")]
    DelayRange(u64, u64),

    #[error("limiter.max_concurrent must be > 0")]
    MaxConcurrentZero,

    #[error("rate_limit.requests_per_second must be > 0")]
    RateZero,

    #[error("rate_limit.burst must be >= 1")]
    BurstTooSmall,

    #[error("cache.ttl_secs must be > 0")]
    CacheTtlZero,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if Url::parse(&config.upstream.base_url).is_err() {
        errors.push(ValidationError::BaseUrl(config.upstream.base_url.clone()));
    }
    if config.retry.backoff_multiplier < 1.0 {
        errors.push(ValidationError::BackoffMultiplier(
            config.retry.backoff_multiplier,
        ));
    }
    if config.retry.initial_delay_ms > config.retry.max_delay_ms {
        errors.push(ValidationError::DelayRange(
            config.retry.initial_delay_ms,
            config.retry.max_delay_ms,
        ));
    }
    if config.limiter.max_concurrent == 0 {
        errors.push(ValidationError::MaxConcurrentZero);
    }
    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_second <= 0.0 {
            errors.push(ValidationError::RateZero);
        }
        if config.rate_limit.burst < 1.0 {
            errors.push(ValidationError::BurstTooSmall);
        }
    }
    if config.cache.enabled && config.cache.ttl_secs == 0 {
        errors.push(ValidationError::CacheTtlZero);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
