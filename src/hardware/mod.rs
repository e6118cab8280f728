// ABOUTME: Kitchen hardware ports: sensor sources, actuator sinks, and bounded hardware calls
// ABOUTME: Defines the traits the sensor hub drives plus the shared sample and command types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Hardware
//!
//! Devices are reached only through [`SensorSource`] and [`ActuatorSink`].
//! Every call goes through [`with_timeout`], so a stuck device surfaces as a
//! `HARDWARE_TIMEOUT` error instead of a hung request or polling loop.
//!
//! Only simulated devices exist today (see [`simulated`]).

/// Sensor hub and its polling task
pub mod hub;
/// Simulated devices
pub mod simulated;

pub use hub::{SensorHub, SensorPollingTask};
pub use simulated::{SimulatedSensorSource, UnavailableActuator};

use async_trait::async_trait;
use autofood_core::errors::{AppError, AppResult};
use autofood_core::models::SensorKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// One value read from a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSample {
    /// Kind of measurement
    pub sensor: SensorKind,
    /// Measured value
    pub value: f64,
    /// Name of the source that produced it
    pub source: String,
    /// When it was read
    pub read_at: DateTime<Utc>,
}

/// Instruction for an actuator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActuatorCommand {
    /// Target actuator
    #[serde(default)]
    pub actuator: String,
    /// Command verb, e.g. `heat` or `stir`
    pub command: String,
    /// Command arguments
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// Something that can be read for sensor values
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Device name used in logs and samples
    fn name(&self) -> &str;

    /// Read every sensor the device exposes
    ///
    /// # Errors
    /// Returns an error when the device cannot be read.
    async fn read(&self) -> AppResult<Vec<SensorSample>>;
}

/// Something that can execute commands
#[async_trait]
pub trait ActuatorSink: Send + Sync {
    /// Device name used in logs and routing
    fn name(&self) -> &str;

    /// Execute a command
    ///
    /// # Errors
    /// Returns an error when the device rejects or cannot execute the command.
    async fn apply(&self, command: &ActuatorCommand) -> AppResult<()>;
}

/// Run a hardware call with an upper bound on its duration
///
/// # Errors
/// `HARDWARE_TIMEOUT` if `call` does not finish within `timeout`, otherwise
/// whatever the call returns.
pub async fn with_timeout<T, F>(device: &str, timeout: Duration, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>> + Send,
{
    tokio::time::timeout(timeout, call).await.unwrap_or_else(|_| {
        Err(AppError::hardware_timeout(
            device,
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ))
    })
}
