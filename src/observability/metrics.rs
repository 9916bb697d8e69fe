//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): proxied requests by resource, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_cache_hits_total` / `gateway_cache_misses_total` (counters)
//! - `gateway_rate_limited_total` (counter): requests rejected up front
//! - `gateway_upstream_retries_total` (counter): attempts that were retried
//! - `gateway_upstream_inflight` (gauge): operations holding a limiter slot

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and register metric descriptions.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    if let Err(e) = builder.install() {
        tracing::error!(error = %e, "Failed to install Prometheus exporter");
        return;
    }

    describe_counter!(
        "gateway_requests_total",
        "Total proxied requests by resource and status"
    );
    describe_histogram!(
        "gateway_request_duration_seconds",
        "Proxy request latency distribution"
    );
    describe_counter!("gateway_cache_hits_total", "Responses served from cache");
    describe_counter!("gateway_cache_misses_total", "Cache lookups that missed");
    describe_counter!(
        "gateway_rate_limited_total",
        "Requests rejected by the rate limiter"
    );
    describe_counter!(
        "gateway_upstream_retries_total",
        "Upstream attempts that were retried"
    );
    describe_gauge!(
        "gateway_upstream_inflight",
        "Operations currently holding a concurrency limiter slot"
    );

    tracing::info!(address = %addr, "Metrics exporter listening");
}

/// Record one proxied request with its final status and latency.
pub fn record_request(resource: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "resource" => resource.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_cache_hit() {
    counter!("gateway_cache_hits_total").increment(1);
}

pub fn record_cache_miss() {
    counter!("gateway_cache_misses_total").increment(1);
}

pub fn record_rate_limited() {
    counter!("gateway_rate_limited_total").increment(1);
}

pub fn record_upstream_retry() {
    counter!("gateway_upstream_retries_total").increment(1);
}

pub fn set_upstream_inflight(active: usize) {
    gauge!("gateway_upstream_inflight").set(active as f64);
}
