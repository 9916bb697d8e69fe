//! HTTP server setup and proxy handlers.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, rate limiting)
//! - Validate and normalize incoming lookups
//! - Serve from cache or fetch through the hardened provider client
//! - Forward upstream status codes transparently

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cache::ResponseCache;
use crate::config::GatewayConfig;
use crate::http::request::{GatewayRequestId, X_REQUEST_ID};
use crate::observability::metrics;
use crate::provider::{ClientBuildError, ProviderClient, ProviderError, ProviderResponse};
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};
use crate::security::validation::{self, ValidationError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<ProviderClient>,
    pub cache: ResponseCache,
    pub cache_enabled: bool,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    cache: ResponseCache,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ClientBuildError> {
        let provider = Arc::new(ProviderClient::new(
            &config.upstream,
            &config.retry,
            &config.limiter,
        )?);
        let cache = ResponseCache::new(Duration::from_secs(config.cache.ttl_secs));

        let state = AppState {
            provider,
            cache: cache.clone(),
            cache_enabled: config.cache.enabled,
        };
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            config,
            cache,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/api/{resource}", get(proxy_handler))
            .route("/api/{resource}/{*rest}", get(proxy_handler))
            .with_state(state);

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(axum::middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, GatewayRequestId))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway server starting");

        if self.config.cache.enabled {
            let cache = self.cache.clone();
            let interval = Duration::from_secs(self.config.cache.sweep_interval_secs);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let removed = cache.purge_expired();
                    if removed > 0 {
                        tracing::debug!(removed, "Purged expired cache entries");
                    }
                }
            });
        }

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Gateway server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Main proxy handler.
/// Validates the lookup, consults the cache, and fetches through the
/// hardened provider client.
async fn proxy_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let start = Instant::now();
    let path = uri.path().trim_start_matches("/api/").trim_end_matches('/');
    let (resource, rest) = match path.split_once('/') {
        Some((resource, rest)) => (resource, Some(rest)),
        None => (path, None),
    };

    if let Err(error) = validation::validate_resource(resource) {
        metrics::record_request(resource, 404, start);
        return reject(StatusCode::NOT_FOUND, &error);
    }
    if let Some(rest) = rest {
        for segment in rest.split('/') {
            if let Err(error) = validation::validate_path_segment(segment) {
                metrics::record_request(resource, 404, start);
                return reject(StatusCode::NOT_FOUND, &error);
            }
        }
    }

    let query = match validation::validate_query(uri.query().unwrap_or("")) {
        Ok(query) => query,
        Err(error) => {
            tracing::debug!(resource, error = %error, "Rejected query");
            metrics::record_request(resource, 400, start);
            return reject(StatusCode::BAD_REQUEST, &error);
        }
    };

    let cache_key = if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    };

    if state.cache_enabled {
        if let Some(hit) = state.cache.get(&cache_key) {
            tracing::debug!(key = %cache_key, "Cache hit");
            metrics::record_cache_hit();
            metrics::record_request(resource, hit.status, start);
            return into_http(hit);
        }
        metrics::record_cache_miss();
    }

    match state.provider.fetch(path, &query).await {
        Ok(response) => {
            if state.cache_enabled && response.status == 200 {
                state.cache.insert(cache_key, response.clone());
            }
            metrics::record_request(resource, response.status, start);
            into_http(response)
        }
        Err(ProviderError::Status(status)) => {
            tracing::warn!(resource, status, "Upstream returned error status");
            metrics::record_request(resource, status, start);
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (code, Json(json!({ "error": "upstream error" }))).into_response()
        }
        Err(error) => {
            tracing::error!(resource, error = %error, "Upstream request failed");
            metrics::record_request(resource, 502, start);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "upstream request failed" })),
            )
                .into_response()
        }
    }
}

fn reject(status: StatusCode, error: &ValidationError) -> Response {
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

fn into_http(response: ProviderResponse) -> Response {
    let mut builder = Response::builder().status(response.status);
    if let Some(content_type) = &response.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type.as_str());
    }
    builder
        .body(Body::from(response.body))
        .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
