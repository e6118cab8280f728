// ABOUTME: Per-client fixed-window rate limiter with periodic cleanup of idle buckets
// ABOUTME: Tracks request counts per IP in a sharded map and reports limit status for headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::config::environment::RateLimitConfig;
use crate::lifecycle::BackgroundTask;

/// Outcome of one rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Whether the request must be rejected
    pub is_limited: bool,
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// Unix timestamp at which the window resets
    pub reset_at: i64,
    /// Seconds to wait before retrying, set only when limited
    pub retry_after_seconds: Option<u64>,
}

/// Fixed-window limiter keyed by client IP
///
/// Uses `DashMap` so checks for different clients never contend on one lock.
#[derive(Clone)]
pub struct ClientRateLimiter {
    /// IP -> (`request_count`, `window_start`)
    state: Arc<DashMap<IpAddr, (u32, Instant)>>,
    limit: u32,
    window: Duration,
}

impl ClientRateLimiter {
    /// Create a limiter allowing `limit` requests per `window`
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            state: Arc::new(DashMap::new()),
            limit,
            window: window.max(Duration::from_secs(1)),
        }
    }

    /// Create a limiter from configuration
    #[must_use]
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.requests_per_window,
            Duration::from_secs(config.window_secs),
        )
    }

    /// Count a request from `client_ip` and report whether it is allowed
    #[must_use]
    pub fn check(&self, client_ip: IpAddr) -> RateLimitStatus {
        let now = Instant::now();

        let mut entry = self.state.entry(client_ip).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        if now.duration_since(*window_start) >= self.window {
            *count = 0;
            *window_start = now;
        }

        let is_limited = *count >= self.limit;
        if !is_limited {
            *count += 1;
        }
        let remaining = self.limit.saturating_sub(*count);
        let started = *window_start;
        drop(entry);

        let until_reset = self.window.saturating_sub(now.duration_since(started));
        let reset_at = SystemTime::now()
            .checked_add(until_reset)
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX));

        RateLimitStatus {
            is_limited,
            limit: self.limit,
            remaining,
            reset_at,
            retry_after_seconds: is_limited.then(|| until_reset.as_secs().max(1)),
        }
    }

    /// Drop buckets whose window ended, returning how many were removed
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.state.len();
        self.state
            .retain(|_ip, (_count, start)| now.duration_since(*start) < self.window);
        before.saturating_sub(self.state.len())
    }

    /// Number of tracked clients
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.state.len()
    }

    /// Requests allowed per window
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Window length
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }
}

/// Background task that removes idle rate limit buckets
pub struct RateLimitCleanupTask {
    limiter: ClientRateLimiter,
    interval: Duration,
}

impl RateLimitCleanupTask {
    /// Create the task
    #[must_use]
    pub const fn new(limiter: ClientRateLimiter, interval: Duration) -> Self {
        Self { limiter, interval }
    }
}

#[async_trait]
impl BackgroundTask for RateLimitCleanupTask {
    fn name(&self) -> &str {
        "rate-limit-cleanup"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run_once(&self) -> Result<()> {
        let removed = self.limiter.cleanup();
        if removed > 0 {
            debug!("Removed {removed} idle rate limit buckets");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_limit_is_enforced_per_client() {
        let limiter = ClientRateLimiter::new(2, Duration::from_secs(60));
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(!limiter.check(a).is_limited);
        assert_eq!(limiter.check(a).remaining, 0);
        let status = limiter.check(a);
        assert!(status.is_limited);
        assert!(status.retry_after_seconds.is_some());

        assert!(!limiter.check(b).is_limited);
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_cleanup_keeps_active_windows() {
        let limiter = ClientRateLimiter::new(5, Duration::from_secs(60));
        let _ = limiter.check(IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(limiter.cleanup(), 0);
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
