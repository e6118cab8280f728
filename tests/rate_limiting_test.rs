// ABOUTME: Tests for per-client rate limiting at the limiter and HTTP level
// ABOUTME: Verifies 429 responses, rate limit headers, client isolation, and bucket cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use autofood_server::middleware::headers;
use autofood_server::rate_limiting::ClientRateLimiter;
use autofood_server::resources::ServerResources;
use autofood_server::server::build_router;
use common::{init_test_logging, send_with_headers, test_config};
use http::{Method, StatusCode};

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[test]
fn test_limiter_blocks_after_limit() {
    let limiter = ClientRateLimiter::new(3, Duration::from_secs(60));
    let client = ip("198.51.100.1");

    for expected_remaining in [2, 1, 0] {
        let status = limiter.check(client);
        assert!(!status.is_limited);
        assert_eq!(status.remaining, expected_remaining);
    }

    let status = limiter.check(client);
    assert!(status.is_limited);
    assert_eq!(status.remaining, 0);
    assert!(status.retry_after_seconds.unwrap() >= 1);
}

#[test]
fn test_limiter_isolates_clients() {
    let limiter = ClientRateLimiter::new(1, Duration::from_secs(60));
    assert!(!limiter.check(ip("198.51.100.1")).is_limited);
    assert!(limiter.check(ip("198.51.100.1")).is_limited);
    assert!(!limiter.check(ip("198.51.100.2")).is_limited);
    assert_eq!(limiter.tracked_clients(), 2);
}

#[tokio::test]
async fn test_window_reset_and_cleanup() {
    let limiter = ClientRateLimiter::new(1, Duration::from_secs(1));
    let client = ip("198.51.100.9");
    assert!(!limiter.check(client).is_limited);
    assert!(limiter.check(client).is_limited);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(limiter.cleanup(), 1);
    assert_eq!(limiter.tracked_clients(), 0);
    assert!(!limiter.check(client).is_limited);
}

#[tokio::test]
async fn test_http_requests_beyond_limit_get_429() {
    init_test_logging();
    let mut config = test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_window = 2;
    let resources = Arc::new(ServerResources::new(config));
    let router = build_router(&resources);
    let client = [("x-forwarded-for", "203.0.113.5")];

    for remaining in ["1", "0"] {
        let response = send_with_headers(&router, Method::GET, "/health", None, &client).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.headers.get(headers::X_RATE_LIMIT_LIMIT).unwrap(), "2");
        assert_eq!(
            response.headers.get(headers::X_RATE_LIMIT_REMAINING).unwrap(),
            remaining
        );
    }

    let response = send_with_headers(
        &router,
        Method::GET,
        "/health",
        None,
        &[("x-forwarded-for", "203.0.113.5"), ("x-request-id", "req-429")],
    )
    .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers.contains_key(headers::RETRY_AFTER));
    assert_eq!(response.body["error"]["code"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(response.body["error"]["type"], "rate_limit");
    assert_eq!(response.body["error"]["requestId"], "req-429");

    // Another client is unaffected
    let response = send_with_headers(
        &router,
        Method::GET,
        "/health",
        None,
        &[("x-forwarded-for", "203.0.113.6")],
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_disabled_limiter_adds_no_headers() {
    let (router, _) = common::create_test_router();
    let response = send_with_headers(&router, Method::GET, "/health", None, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.headers.contains_key(headers::X_RATE_LIMIT_LIMIT));
}
