// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use anyhow::{Context, Result};
use autofood_core::constants::consumption::{DEFAULT_MAX_ADJUSTMENT_PCT, DEFAULT_WASTE_THRESHOLD_PCT};
use autofood_core::constants::{hardware, network, rate_limits, storage};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::consumption::ConsumptionSettings;
use crate::storage::RepositoryConfig;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Default operational logging
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Live deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a development environment
    #[must_use]
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a testing environment
    #[must_use]
    pub const fn is_testing(&self) -> bool {
        matches!(self, Self::Testing)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Per-client request limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,
    /// Requests per window
    pub requests_per_window: u32,
    /// Window duration in seconds
    pub window_secs: u64,
    /// How often idle buckets are dropped
    pub cleanup_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_window: rate_limits::DEFAULT_REQUESTS_PER_WINDOW,
            window_secs: rate_limits::DEFAULT_WINDOW_SECS,
            cleanup_interval_secs: rate_limits::DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

/// Bounds of the session and profile repositories
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Maximum number of cooking sessions kept
    pub session_capacity: usize,
    /// Idle time after which a session is dropped
    pub session_ttl_secs: u64,
    /// Maximum number of consumption profiles kept
    pub profile_capacity: usize,
    /// Idle time after which a profile is dropped
    pub profile_ttl_secs: u64,
    /// How often expired entries are swept
    pub sweep_interval_secs: u64,
}

impl StorageConfig {
    /// Repository policy for cooking sessions
    #[must_use]
    pub const fn sessions(&self) -> RepositoryConfig {
        RepositoryConfig {
            capacity: self.session_capacity,
            ttl: Duration::from_secs(self.session_ttl_secs),
        }
    }

    /// Repository policy for consumption profiles
    #[must_use]
    pub const fn profiles(&self) -> RepositoryConfig {
        RepositoryConfig {
            capacity: self.profile_capacity,
            ttl: Duration::from_secs(self.profile_ttl_secs),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_capacity: storage::DEFAULT_SESSION_CAPACITY,
            session_ttl_secs: storage::DEFAULT_SESSION_TTL_SECS,
            profile_capacity: storage::DEFAULT_PROFILE_CAPACITY,
            profile_ttl_secs: storage::DEFAULT_PROFILE_TTL_SECS,
            sweep_interval_secs: storage::DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

/// Defaults for new consumption profiles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionConfig {
    /// Mean waste percentage that triggers a suggestion
    pub waste_threshold_pct: f64,
    /// Largest reduction per suggestion, in percent
    pub max_adjustment_pct: f64,
    /// Whether portion changes need approval
    pub require_consultation: bool,
}

impl ConsumptionConfig {
    /// Settings seeded into every new profile
    #[must_use]
    pub const fn settings(&self) -> ConsumptionSettings {
        ConsumptionSettings {
            requires_consultation: self.require_consultation,
            waste_threshold_pct: self.waste_threshold_pct,
            max_adjustment_pct: self.max_adjustment_pct,
        }
    }
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            waste_threshold_pct: DEFAULT_WASTE_THRESHOLD_PCT,
            max_adjustment_pct: DEFAULT_MAX_ADJUSTMENT_PCT,
            require_consultation: true,
        }
    }
}

/// Sensor polling and device call bounds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HardwareConfig {
    /// Run the sensor polling task
    pub sensor_polling_enabled: bool,
    /// Polling period in milliseconds
    pub sensor_poll_interval_ms: u64,
    /// Upper bound of one device call in milliseconds
    pub timeout_ms: u64,
}

impl HardwareConfig {
    /// Polling period
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.sensor_poll_interval_ms)
    }

    /// Device call bound
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            sensor_polling_enabled: true,
            sensor_poll_interval_ms: hardware::DEFAULT_SENSOR_POLL_INTERVAL_MS,
            timeout_ms: hardware::DEFAULT_HARDWARE_TIMEOUT_MS,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Rate limiting
    pub rate_limit: RateLimitConfig,
    /// Repository bounds
    pub storage: StorageConfig,
    /// Consumption tracker defaults
    pub consumption: ConsumptionConfig,
    /// Hardware settings
    pub hardware: HardwareConfig,
    /// Comma-separated allowed CORS origins, `*` for any
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: network::DEFAULT_HOST.to_owned(),
            http_port: network::DEFAULT_HTTP_PORT,
            environment: Environment::default(),
            log_level: LogLevel::default(),
            rate_limit: RateLimitConfig::default(),
            storage: StorageConfig::default(),
            consumption: ConsumptionConfig::default(),
            hardware: HardwareConfig::default(),
            cors_allowed_origins: "*".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the result fails
    /// [`Self::validate`].
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let defaults = Self::default();
        let config = Self {
            host: env_var_or("HOST", &defaults.host)?,
            http_port: env_parse("HTTP_PORT", defaults.http_port)?,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )?),
            log_level: LogLevel::from_str_or_default(&env_var_or("LOG_LEVEL", "info")?),
            rate_limit: RateLimitConfig {
                enabled: env_parse("RATE_LIMIT_ENABLED", defaults.rate_limit.enabled)?,
                requests_per_window: env_parse(
                    "RATE_LIMIT_REQUESTS",
                    defaults.rate_limit.requests_per_window,
                )?,
                window_secs: env_parse("RATE_LIMIT_WINDOW", defaults.rate_limit.window_secs)?,
                cleanup_interval_secs: env_parse(
                    "RATE_LIMIT_CLEANUP_INTERVAL_SECS",
                    defaults.rate_limit.cleanup_interval_secs,
                )?,
            },
            storage: StorageConfig {
                session_capacity: env_parse("SESSION_CAPACITY", defaults.storage.session_capacity)?,
                session_ttl_secs: env_parse("SESSION_TTL_SECS", defaults.storage.session_ttl_secs)?,
                profile_capacity: env_parse("PROFILE_CAPACITY", defaults.storage.profile_capacity)?,
                profile_ttl_secs: env_parse("PROFILE_TTL_SECS", defaults.storage.profile_ttl_secs)?,
                sweep_interval_secs: env_parse(
                    "STORAGE_SWEEP_INTERVAL_SECS",
                    defaults.storage.sweep_interval_secs,
                )?,
            },
            consumption: ConsumptionConfig {
                waste_threshold_pct: env_parse(
                    "WASTE_THRESHOLD_PCT",
                    defaults.consumption.waste_threshold_pct,
                )?,
                max_adjustment_pct: env_parse(
                    "MAX_ADJUSTMENT_PCT",
                    defaults.consumption.max_adjustment_pct,
                )?,
                require_consultation: env_parse(
                    "REQUIRE_CONSULTATION",
                    defaults.consumption.require_consultation,
                )?,
            },
            hardware: HardwareConfig {
                sensor_polling_enabled: env_parse(
                    "SENSOR_POLLING_ENABLED",
                    defaults.hardware.sensor_polling_enabled,
                )?,
                sensor_poll_interval_ms: env_parse(
                    "SENSOR_POLL_INTERVAL_MS",
                    defaults.hardware.sensor_poll_interval_ms,
                )?,
                timeout_ms: env_parse("HARDWARE_TIMEOUT_MS", defaults.hardware.timeout_ms)?,
            },
            cors_allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", &defaults.cors_allowed_origins)?,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for zero capacities, zero intervals or percentages
    /// outside `0..=100`.
    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow::anyhow!("HTTP_PORT must not be 0"));
        }
        if self.storage.session_capacity == 0 || self.storage.profile_capacity == 0 {
            return Err(anyhow::anyhow!(
                "SESSION_CAPACITY and PROFILE_CAPACITY must be greater than 0"
            ));
        }
        if self.storage.sweep_interval_secs == 0 {
            return Err(anyhow::anyhow!("STORAGE_SWEEP_INTERVAL_SECS must be greater than 0"));
        }
        if self.rate_limit.enabled
            && (self.rate_limit.requests_per_window == 0 || self.rate_limit.window_secs == 0)
        {
            return Err(anyhow::anyhow!(
                "RATE_LIMIT_REQUESTS and RATE_LIMIT_WINDOW must be greater than 0"
            ));
        }
        if self.rate_limit.cleanup_interval_secs == 0 {
            return Err(anyhow::anyhow!(
                "RATE_LIMIT_CLEANUP_INTERVAL_SECS must be greater than 0"
            ));
        }
        if self.hardware.sensor_poll_interval_ms == 0 || self.hardware.timeout_ms == 0 {
            return Err(anyhow::anyhow!(
                "SENSOR_POLL_INTERVAL_MS and HARDWARE_TIMEOUT_MS must be greater than 0"
            ));
        }
        self.consumption
            .settings()
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid consumption settings: {}", e.message))?;

        if self.environment.is_production() && !self.rate_limit.enabled {
            warn!("Rate limiting is disabled in production");
        }
        Ok(())
    }

    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Autofood Server Configuration:\n\
             - Environment: {}\n\
             - Listen: {}\n\
             - Log Level: {}\n\
             - Rate Limiting: {}\n\
             - Sessions: capacity {}, ttl {}s\n\
             - Profiles: capacity {}, ttl {}s\n\
             - Waste Threshold: {}%\n\
             - Max Adjustment: {}%\n\
             - Consultation Required: {}\n\
             - Sensor Polling: {}",
            self.environment,
            self.bind_address(),
            self.log_level,
            if self.rate_limit.enabled {
                format!(
                    "{} req / {}s",
                    self.rate_limit.requests_per_window, self.rate_limit.window_secs
                )
            } else {
                "Disabled".to_owned()
            },
            self.storage.session_capacity,
            self.storage.session_ttl_secs,
            self.storage.profile_capacity,
            self.storage.profile_ttl_secs,
            self.consumption.waste_threshold_pct,
            self.consumption.max_adjustment_pct,
            self.consumption.require_consultation,
            if self.hardware.sensor_polling_enabled {
                format!("every {}ms", self.hardware.sensor_poll_interval_ms)
            } else {
                "Disabled".to_owned()
            },
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> Result<String> {
    Ok(env::var(key).unwrap_or_else(|_| default.to_owned()))
}

/// Parse an environment variable, falling back to `default` when unset
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_var_or(key, &default.to_string())?
        .trim()
        .parse()
        .with_context(|| format!("Invalid {key} value"))
}
