//! Upstream football-data provider access.
//!
//! # Data Flow
//! ```text
//! proxy handler
//!     → client.rs (build URL, attach API key, compose retry + limiter)
//!     → error.rs (classify failures for the retry predicate)
//!     → raw status/body forwarded back to the handler
//! ```
//!
//! # Design Decisions
//! - The gateway forwards provider bytes; it does not model payloads
//! - Errors carry an explicit kind plus status code, never an ad hoc shape
//! - Each retry attempt is individually admitted by the limiter, so a slot
//!   is never held across a backoff wait

pub mod client;
pub mod error;

pub use client::{ClientBuildError, ProviderClient, ProviderResponse};
pub use error::{ProviderError, ProviderResult};
