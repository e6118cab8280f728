// ABOUTME: Rate limiting middleware for HTTP requests
// ABOUTME: Enforces per-client request limits and adds standard rate limit headers

//! # Rate Limiting Middleware with HTTP Headers
//!
//! Every response carries the `X-RateLimit-*` headers; rejected requests get
//! a 429 error envelope with `Retry-After`.

use autofood_core::errors::AppError;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, HeaderValue};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tracing::{warn, Span};

use super::request_id::RequestId;
use crate::rate_limiting::RateLimitStatus;
use crate::resources::ServerResources;

/// HTTP header names for rate limiting
pub mod headers {
    /// HTTP header name for maximum requests allowed in the current window
    pub const X_RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
    /// HTTP header name for remaining requests in the current window
    pub const X_RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
    /// HTTP header name for Unix timestamp when rate limit resets
    pub const X_RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";
    /// HTTP header name for retry-after duration in seconds
    pub const RETRY_AFTER: &str = "Retry-After";
    /// Proxy header carrying the original client address
    pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
    /// Single client address set by some reverse proxies
    pub const X_REAL_IP: &str = "x-real-ip";
}

/// Create a `HeaderMap` with rate limit headers
#[must_use]
pub fn create_rate_limit_headers(status: &RateLimitStatus) -> HeaderMap {
    let mut map = HeaderMap::new();
    let mut put = |name: &'static str, value: String| {
        if let Ok(header_value) = HeaderValue::from_str(&value) {
            map.insert(name, header_value);
        }
    };

    put(headers::X_RATE_LIMIT_LIMIT, status.limit.to_string());
    put(headers::X_RATE_LIMIT_REMAINING, status.remaining.to_string());
    put(headers::X_RATE_LIMIT_RESET, status.reset_at.to_string());
    if let Some(retry_after) = status.retry_after_seconds {
        put(headers::RETRY_AFTER, retry_after.to_string());
    }
    map
}

/// Best-effort client address: first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then the socket peer
#[must_use]
pub fn client_ip(request: &Request) -> IpAddr {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    };

    header(headers::X_FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse().ok())
        .or_else(|| header(headers::X_REAL_IP).and_then(|value| value.trim().parse().ok()))
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Reject clients above their request budget
pub async fn rate_limit_middleware(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    if !resources.config.rate_limit.enabled {
        return next.run(request).await;
    }

    let ip = client_ip(&request);
    Span::current().record("client_ip", tracing::field::display(ip));
    let status = resources.rate_limiter.check(ip);
    let rate_headers = create_rate_limit_headers(&status);

    if status.is_limited {
        warn!(client_ip = %ip, limit = status.limit, "Rate limit exceeded");
        let mut error =
            AppError::rate_limit_exceeded(status.limit, status.retry_after_seconds.unwrap_or(1));
        if let Some(request_id) = request.extensions().get::<RequestId>() {
            error = error.with_request_id(request_id.as_str());
        }
        return (rate_headers, error).into_response();
    }

    let mut response = next.run(request).await;
    response.headers_mut().extend(rate_headers);
    response
}
