//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; the request ID flows through all
//!   subsystems as a span/header field
//! - Metrics are cheap (atomic increments) and exposed for Prometheus scrape

pub mod metrics;
