//! Provider error taxonomy.

use std::time::Duration;

use thiserror::Error;

/// Errors from a single upstream request, tagged by origin.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, DNS, or transport failure before a response arrived.
    #[error("upstream connection failed: {0}")]
    Network(String),

    /// The upstream request exceeded its deadline.
    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered with a non-success HTTP status.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The response arrived but its body could not be read.
    #[error("upstream response unreadable: {0}")]
    InvalidResponse(String),

    /// The request could not be constructed for the provider.
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Default retry classification: transient network failures, server
    /// errors (5xx), and rate limiting (429) are retryable; everything else
    /// is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Network(_) | ProviderError::Timeout(_) => true,
            ProviderError::Status(status) => *status >= 500 || *status == 429,
            ProviderError::InvalidResponse(_) | ProviderError::InvalidRequest(_) => false,
        }
    }

    /// Classify a transport-level failure from the HTTP client.
    pub fn from_transport(error: reqwest::Error, deadline: Duration) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout(deadline)
        } else {
            ProviderError::Network(error.to_string())
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
