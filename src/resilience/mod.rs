//! Resilience utilities for outbound calls.
//!
//! # Data Flow
//! ```text
//! Route handler
//!     → retry.rs (bounded attempts, exponential delay between failures)
//!     → limiter.rs (admit at most N in-flight upstream calls, FIFO)
//!     → single upstream request
//! ```
//!
//! # Design Decisions
//! - Delays are deterministic (no jitter) and capped
//! - Retry classification is injected by the caller, not hardcoded
//! - The limiter is error-transparent and never cancels peers
//! - Neither utility cancels or times out the wrapped operation; deadlines
//!   belong to the caller

pub mod backoff;
pub mod limiter;
pub mod retry;

pub use backoff::calculate_delay;
pub use limiter::RequestLimiter;
pub use retry::RetryPolicy;
