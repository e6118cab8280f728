// ABOUTME: Shared test utilities for Autofood integration tests
// ABOUTME: Provides logging setup, test resources, and a JSON request helper for the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs
)]

use std::sync::{Arc, Once};

use autofood_core::models::Instruction;
use autofood_server::config::ServerConfig;
use autofood_server::resources::ServerResources;
use autofood_server::server::build_router;
use axum::body::Body;
use axum::Router;
use http::{HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet test logging once per test binary
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Configuration without background noise: no rate limit, no polling
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.rate_limit.enabled = false;
    config.hardware.sensor_polling_enabled = false;
    config
}

/// Resources built from [`test_config`]
pub fn create_test_resources() -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::new(test_config()))
}

/// Router and the resources behind it
pub fn create_test_router() -> (Router, Arc<ServerResources>) {
    let resources = create_test_resources();
    (build_router(&resources), resources)
}

/// Register a recipe with `steps` untimed instructions
pub fn create_recipe(resources: &ServerResources, steps: usize) -> Uuid {
    let instructions = (1..=steps)
        .map(|n| Instruction {
            step: format!("Step {n}"),
            timing_minutes: None,
        })
        .collect();
    resources
        .recipes
        .create("Test Recipe", 2, instructions)
        .unwrap()
        .id
}

/// Decoded response of [`send_json`]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send a request through the router and decode the JSON body
pub async fn send_json(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> TestResponse {
    send_with_headers(router, method, uri, body, &[]).await
}

/// Like [`send_json`] with extra request headers
pub async fn send_with_headers(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        body,
    }
}
