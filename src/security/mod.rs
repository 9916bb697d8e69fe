//! Request admission and input hygiene.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → rate_limit.rs (per-client token bucket, 429 on exhaustion)
//!     → validation.rs (resource allowlist, query sanitization)
//!     → proxy handler
//! ```

pub mod rate_limit;
pub mod validation;
