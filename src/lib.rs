//! Football data gateway library.

pub mod cache;
pub mod config;
pub mod http;
pub mod observability;
pub mod provider;
pub mod resilience;
pub mod security;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use resilience::{RequestLimiter, RetryPolicy};
