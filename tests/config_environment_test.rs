// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Validates defaults, overrides, parse failures, and validation rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use autofood_server::config::environment::{Environment, LogLevel, ServerConfig};
use serial_test::serial;

const VARS: &[&str] = &[
    "HTTP_PORT",
    "HOST",
    "ENVIRONMENT",
    "LOG_LEVEL",
    "RATE_LIMIT_ENABLED",
    "RATE_LIMIT_REQUESTS",
    "RATE_LIMIT_WINDOW",
    "SESSION_CAPACITY",
    "PROFILE_TTL_SECS",
    "WASTE_THRESHOLD_PCT",
    "MAX_ADJUSTMENT_PCT",
    "REQUIRE_CONSULTATION",
    "SENSOR_POLLING_ENABLED",
    "HARDWARE_TIMEOUT_MS",
    "CORS_ALLOWED_ORIGINS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, 8081);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.rate_limit.enabled);
    assert_eq!(config.rate_limit.requests_per_window, 120);
    assert_eq!(config.storage.session_capacity, 10_000);
    assert!((config.consumption.waste_threshold_pct - 15.0).abs() < f64::EPSILON);
    assert!((config.consumption.max_adjustment_pct - 20.0).abs() < f64::EPSILON);
    assert!(config.consumption.require_consultation);
    assert_eq!(config.cors_allowed_origins, "*");
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("HTTP_PORT", "9090");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("LOG_LEVEL", "debug");
    env::set_var("RATE_LIMIT_REQUESTS", "10");
    env::set_var("WASTE_THRESHOLD_PCT", "25.5");
    env::set_var("REQUIRE_CONSULTATION", "false");
    env::set_var("SENSOR_POLLING_ENABLED", "false");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://kitchen.example");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.http_port, 9090);
    assert!(config.environment.is_production());
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.rate_limit.requests_per_window, 10);
    assert!((config.consumption.waste_threshold_pct - 25.5).abs() < f64::EPSILON);
    assert!(!config.consumption.require_consultation);
    assert!(!config.hardware.sensor_polling_enabled);
    assert_eq!(config.bind_address(), "0.0.0.0:9090");
    assert_eq!(
        config.consumption.settings().waste_threshold_pct,
        config.consumption.waste_threshold_pct
    );
}

#[test]
#[serial]
fn test_unparsable_value_is_an_error() {
    clear_env();
    env::set_var("HTTP_PORT", "eighty");
    let result = ServerConfig::from_env();
    clear_env();

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("HTTP_PORT"));
}

#[test]
#[serial]
fn test_invalid_values_fail_validation() {
    clear_env();
    env::set_var("MAX_ADJUSTMENT_PCT", "150");
    assert!(ServerConfig::from_env().is_err());
    clear_env();

    env::set_var("SESSION_CAPACITY", "0");
    assert!(ServerConfig::from_env().is_err());
    clear_env();

    env::set_var("HARDWARE_TIMEOUT_MS", "0");
    assert!(ServerConfig::from_env().is_err());
    clear_env();
}

#[test]
fn test_summary_mentions_key_settings() {
    let mut config = ServerConfig::default();
    config.rate_limit.enabled = false;
    let summary = config.summary();

    assert!(summary.contains("0.0.0.0:8081"));
    assert!(summary.contains("Rate Limiting: Disabled"));
    assert!(summary.contains("Waste Threshold: 15%"));
}
