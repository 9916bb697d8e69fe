//! End-to-end tests for the proxy path.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_retries_on_503_then_succeeds() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let provider = common::start_mock_provider(move || {
        let cc = cc.clone();
        async move {
            let count = cc.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                (503, "{\"error\":\"maintenance\"}".to_string())
            } else {
                (200, "{\"teams\":[]}".to_string())
            }
        }
    })
    .await;

    let gateway = common::start_gateway(common::test_config(provider)).await;

    let response = reqwest::get(format!("http://{gateway}/api/teams/42"))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), StatusCode::OK.as_u16());
    assert_eq!(response.text().await.unwrap(), "{\"teams\":[]}");
    assert_eq!(call_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_client_error_forwarded_without_retry() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let provider = common::start_mock_provider(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (404, "{\"error\":\"no such team\"}".to_string())
        }
    })
    .await;

    let gateway = common::start_gateway(common::test_config(provider)).await;

    let response = reqwest::get(format!("http://{gateway}/api/teams/99"))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_resource_rejected_before_upstream() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let provider = common::start_mock_provider(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (200, "{}".to_string())
        }
    })
    .await;

    let gateway = common::start_gateway(common::test_config(provider)).await;

    let response = reqwest::get(format!("http://{gateway}/api/managers"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = reqwest::get(format!("http://{gateway}/api/teams?bogus=1"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    assert_eq!(call_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cache_serves_repeat_lookup() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let provider = common::start_mock_provider(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (200, "{\"fixtures\":[]}".to_string())
        }
    })
    .await;

    let mut config = common::test_config(provider);
    config.cache.enabled = true;
    config.cache.ttl_secs = 60;
    let gateway = common::start_gateway(config).await;

    for _ in 0..2 {
        let response = reqwest::get(format!("http://{gateway}/api/fixtures?season=2025"))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.text().await.unwrap(), "{\"fixtures\":[]}");
    }

    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rate_limit_rejects_burst_overflow() {
    let provider = common::start_mock_provider(|| async { (200, "{}".to_string()) }).await;

    let mut config = common::test_config(provider);
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1.0;
    config.rate_limit.burst = 2.0;
    let gateway = common::start_gateway(config).await;

    let client = reqwest::Client::new();
    let mut statuses = Vec::new();
    for _ in 0..3 {
        let response = client
            .get(format!("http://{gateway}/api/transfers"))
            .send()
            .await
            .unwrap();
        statuses.push(response.status().as_u16());
    }

    assert_eq!(statuses, vec![200, 200, 429]);
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let provider = common::start_mock_provider(|| async { (200, "{}".to_string()) }).await;
    let gateway = common::start_gateway(common::test_config(provider)).await;

    let response = reqwest::get(format!("http://{gateway}/api/players?search=kane"))
        .await
        .unwrap();

    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(uuid::Uuid::parse_str(&request_id).is_ok());
}
