//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use touchline::config::GatewayConfig;
use touchline::GatewayServer;

/// Start a programmable mock provider that answers every request with the
/// (status, body) produced by `f`.
#[allow(dead_code)]
pub async fn start_mock_provider<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let f = f.clone();
            tokio::spawn(async move {
                // Read the request head; its contents are ignored.
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let (status, body) = f().await;
                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    429 => "Too Many Requests",
                    503 => "Service Unavailable",
                    _ => "Error",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Gateway config pointed at a mock provider, tuned for fast tests.
#[allow(dead_code)]
pub fn test_config(provider: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.upstream.base_url = format!("http://{provider}");
    config.upstream.request_timeout_secs = 5;
    config.retry.initial_delay_ms = 10;
    config.retry.max_delay_ms = 50;
    config.limiter.min_delay_ms = 1;
    config.rate_limit.enabled = false;
    config.cache.enabled = false;
    config
}

/// Start the gateway on an ephemeral port and return its address.
#[allow(dead_code)]
pub async fn start_gateway(config: GatewayConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = GatewayServer::new(config).unwrap();

    tokio::spawn(async move {
        server.run(listener).await.unwrap();
    });

    addr
}
