//! Outbound client for the football-data provider.
//!
//! # Responsibilities
//! - Build provider URLs from validated path and query
//! - Attach the API key header when configured
//! - Harden each fetch with the retry policy and concurrency limiter
//! - Hand raw status/body back for transparent forwarding

use std::time::Duration;

use bytes::Bytes;
use reqwest::header;
use thiserror::Error;
use url::Url;

use crate::config::{LimiterConfig, RetryConfig, UpstreamConfig};
use crate::observability::metrics;
use crate::provider::error::{ProviderError, ProviderResult};
use crate::resilience::limiter::RequestLimiter;
use crate::resilience::retry::RetryPolicy;

/// Raw upstream response forwarded to the dashboard unchanged.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Errors constructing the client from configuration.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid upstream base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the provider, hardened with retry and concurrency limits.
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    api_key_header: String,
    request_timeout: Duration,
    limiter: RequestLimiter,
    retry: RetryPolicy<ProviderError>,
}

impl ProviderClient {
    /// Build a client from the upstream, retry, and limiter configuration.
    pub fn new(
        upstream: &UpstreamConfig,
        retry: &RetryConfig,
        limiter: &LimiterConfig,
    ) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(&upstream.base_url)?;
        let request_timeout = Duration::from_secs(upstream.request_timeout_secs);
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;

        let retry = RetryPolicy::from_config(retry)
            .should_retry(ProviderError::is_retryable)
            .on_retry(|attempt, error: &ProviderError| {
                metrics::record_upstream_retry();
                tracing::warn!(attempt, error = %error, "Retrying upstream request");
            });

        Ok(Self {
            http,
            base_url,
            api_key: upstream.api_key.clone(),
            api_key_header: upstream.api_key_header.clone(),
            request_timeout,
            limiter: RequestLimiter::from_config(limiter),
            retry,
        })
    }

    /// Fetch `path` (e.g. `teams/42`) with an already-normalized query string.
    ///
    /// Each attempt acquires its own limiter slot; backoff waits happen
    /// outside the limiter so a slot is never held while sleeping.
    pub async fn fetch(&self, path: &str, query: &str) -> ProviderResult<ProviderResponse> {
        let url = self.endpoint(path, query)?;

        let result = self
            .retry
            .execute(|| {
                let url = url.clone();
                async move { self.limiter.run(self.single_get(url)).await }
            })
            .await;

        metrics::set_upstream_inflight(self.limiter.active());
        result
    }

    /// One unguarded GET against the provider.
    async fn single_get(&self, url: Url) -> ProviderResult<ProviderResponse> {
        let mut request = self.http.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(&self.api_key_header, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(e, self.request_timeout))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(ProviderResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }

    fn endpoint(&self, path: &str, query: &str) -> ProviderResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ProviderError::InvalidRequest("base URL cannot be a base".into()))?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    /// The concurrency limiter guarding this client.
    pub fn limiter(&self) -> &RequestLimiter {
        &self.limiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn test_client(base_url: &str) -> ProviderClient {
        let mut config = GatewayConfig::default();
        config.upstream.base_url = base_url.to_string();
        ProviderClient::new(&config.upstream, &config.retry, &config.limiter).unwrap()
    }

    #[test]
    fn test_endpoint_joins_path_segments() {
        let client = test_client("https://api.football.example/v4");
        let url = client.endpoint("teams/42", "").unwrap();
        assert_eq!(url.as_str(), "https://api.football.example/v4/teams/42");
    }

    #[test]
    fn test_endpoint_appends_query() {
        let client = test_client("https://api.football.example/v4");
        let url = client.endpoint("players", "search=kane&season=2025").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.football.example/v4/players?search=kane&season=2025"
        );
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let client = test_client("https://api.football.example/v4/");
        let url = client.endpoint("fixtures", "").unwrap();
        assert_eq!(url.as_str(), "https://api.football.example/v4/fixtures");
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = GatewayConfig::default();
        config.upstream.base_url = "not a url".to_string();
        let result = ProviderClient::new(&config.upstream, &config.retry, &config.limiter);
        assert!(matches!(result, Err(ClientBuildError::BaseUrl(_))));
    }
}
