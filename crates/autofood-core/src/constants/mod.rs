// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants organized by domain for the Autofood service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Defaults live here; runtime overrides are read by the server's
//! `config::environment` module.

/// Consumption tracking thresholds and window sizes
pub mod consumption;
/// Storage capacity and expiry defaults
pub mod storage;

/// Service identity used in logs and health responses
pub mod service_names {
    /// Name of the HTTP server binary and tracing target
    pub const AUTOFOOD_SERVER: &str = "autofood-server";
}

/// Recipe validation limits
pub mod recipes {
    /// Longest timing one instruction may declare (one week, in minutes)
    pub const MAX_STEP_TIMING_MINUTES: f64 = 10_080.0;
}

/// Network defaults
pub mod network {
    /// Default HTTP listen port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    /// Header carrying the request correlation ID
    pub const REQUEST_ID_HEADER: &str = "x-request-id";
    /// Upper bound for request handling before the server answers 408
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Rate limiting defaults
pub mod rate_limits {
    /// Requests allowed per client in one window
    pub const DEFAULT_REQUESTS_PER_WINDOW: u32 = 120;
    /// Window length in seconds
    pub const DEFAULT_WINDOW_SECS: u64 = 60;
    /// How often stale buckets are swept
    pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;
}

/// Simulated hardware defaults
pub mod hardware {
    /// Sensor polling period in milliseconds
    pub const DEFAULT_SENSOR_POLL_INTERVAL_MS: u64 = 1_000;
    /// Upper bound for any single hardware call
    pub const DEFAULT_HARDWARE_TIMEOUT_MS: u64 = 2_000;
    /// Nominal oven temperature the simulator jitters around (Celsius)
    pub const SIMULATED_BASE_TEMPERATURE_C: f64 = 180.0;
    /// Nominal kitchen humidity (percent)
    pub const SIMULATED_BASE_HUMIDITY_PCT: f64 = 45.0;
    /// Nominal scale load (grams)
    pub const SIMULATED_BASE_WEIGHT_G: f64 = 500.0;
}
