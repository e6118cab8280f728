// ABOUTME: Tests for logging configuration read from the environment
// ABOUTME: Validates defaults, format parsing, and production detail settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use autofood_server::logging::{LogFormat, LoggingConfig};
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
    "RUST_LOG",
    "LOG_LEVEL",
    "LOG_FORMAT",
    "ENVIRONMENT",
    "SERVICE_NAME",
    "LOG_INCLUDE_SPANS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    clear_env();
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("SERVICE_NAME", "kitchen-7");

    let config = LoggingConfig::from_env();
    clear_env();

    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.environment, "production");
    assert_eq!(config.service_name, "kitchen-7");
    assert!(config.include_location);
    assert!(config.include_thread);
    assert!(!config.include_spans);
}

#[test]
#[serial]
fn test_log_level_falls_back_to_log_level_var() {
    clear_env();
    env::set_var("LOG_LEVEL", "warn");
    let config = LoggingConfig::from_env();
    clear_env();

    assert_eq!(config.level, "warn");
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(!config.include_location);
}

#[test]
fn test_default_logging_config() {
    let config = LoggingConfig::default();

    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.environment, "development");
    assert_eq!(config.service_name, "autofood-server");
    assert_eq!(config.request_id_header, "x-request-id");
}

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str_or_default("JSON"), LogFormat::Json);
    assert_eq!(LogFormat::from_str_or_default("compact"), LogFormat::Compact);
    assert_eq!(LogFormat::from_str_or_default("fancy"), LogFormat::Pretty);
}

#[test]
#[serial]
fn test_env_filter_builds_for_any_level() {
    clear_env();
    let config = LoggingConfig {
        level: "not-a-level".into(),
        ..LoggingConfig::default()
    };
    // Invalid directives fall back rather than panic
    let filter = config.env_filter();
    assert!(!filter.to_string().is_empty());
}
