//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (request ID generation)
//!     → security (rate limit, validation)
//!     → cache / provider
//!     → response forwarded to client
//! ```

pub mod request;
pub mod server;

pub use request::{GatewayRequestId, X_REQUEST_ID};
pub use server::GatewayServer;
