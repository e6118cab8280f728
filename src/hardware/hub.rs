// ABOUTME: Sensor hub holding the latest reading per sensor and routing actuator commands
// ABOUTME: Polled periodically by a background task; every device call is timeout-bounded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use async_trait::async_trait;
use autofood_core::errors::{AppError, AppResult};
use autofood_core::models::SensorKind;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{with_timeout, ActuatorCommand, ActuatorSink, SensorSample, SensorSource};
use crate::lifecycle::BackgroundTask;

/// Registry of devices plus the most recent value of each sensor kind
pub struct SensorHub {
    sources: Vec<Arc<dyn SensorSource>>,
    actuators: DashMap<String, Arc<dyn ActuatorSink>>,
    latest: DashMap<SensorKind, SensorSample>,
    timeout: Duration,
}

impl SensorHub {
    /// Create a hub without devices
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            actuators: DashMap::new(),
            latest: DashMap::new(),
            timeout,
        }
    }

    /// Add a sensor source
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn SensorSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Add an actuator, replacing one with the same name
    #[must_use]
    pub fn with_actuator(self, actuator: Arc<dyn ActuatorSink>) -> Self {
        self.actuators
            .insert(actuator.name().to_lowercase(), actuator);
        self
    }

    /// Read every source once and keep the newest value per sensor kind
    ///
    /// A failing source is logged and skipped.
    ///
    /// # Errors
    /// Returns the last error when every source failed.
    pub async fn poll_once(&self) -> AppResult<usize> {
        let mut stored = 0;
        let mut last_error = None;

        for source in &self.sources {
            match with_timeout(source.name(), self.timeout, source.read()).await {
                Ok(samples) => {
                    for sample in samples {
                        if sample.value.is_finite() {
                            self.latest.insert(sample.sensor.clone(), sample);
                            stored += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Sensor read failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if stored == 0 => Err(e),
            _ => {
                debug!("Sensor poll stored {stored} readings");
                Ok(stored)
            }
        }
    }

    /// Latest reading of every sensor kind, ordered by kind
    #[must_use]
    pub fn latest_readings(&self) -> Vec<SensorSample> {
        let mut readings: Vec<SensorSample> =
            self.latest.iter().map(|entry| entry.value().clone()).collect();
        readings.sort_by(|a, b| a.sensor.cmp(&b.sensor));
        readings
    }

    /// Names of registered actuators
    #[must_use]
    pub fn actuator_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.actuators.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Send a command to the named actuator
    ///
    /// # Errors
    /// `ResourceNotFound` for unknown actuators, `HARDWARE_TIMEOUT` when the
    /// device does not answer in time, or the device's own error.
    pub async fn actuate(&self, name: &str, command: &ActuatorCommand) -> AppResult<()> {
        let key = name.trim().to_lowercase();
        let actuator = self
            .actuators
            .get(&key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AppError::not_found(format!("Actuator '{key}'")).with_resource_id(key.clone()))?;

        with_timeout(actuator.name(), self.timeout, actuator.apply(command)).await
    }
}

/// Background task that polls the hub on a fixed interval
pub struct SensorPollingTask {
    hub: Arc<SensorHub>,
    interval: Duration,
}

impl SensorPollingTask {
    /// Create the task
    #[must_use]
    pub const fn new(hub: Arc<SensorHub>, interval: Duration) -> Self {
        Self { hub, interval }
    }
}

#[async_trait]
impl BackgroundTask for SensorPollingTask {
    fn name(&self) -> &str {
        "sensor-polling"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run_once(&self) -> Result<()> {
        self.hub.poll_once().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{SimulatedSensorSource, UnavailableActuator};
    use autofood_core::errors::ErrorCode;

    fn hub() -> SensorHub {
        SensorHub::new(Duration::from_millis(500))
            .with_source(Arc::new(SimulatedSensorSource::new("sim")))
            .with_actuator(Arc::new(UnavailableActuator::new("Oven")))
    }

    #[tokio::test]
    async fn test_poll_stores_latest_per_kind() {
        let hub = hub();
        assert!(hub.latest_readings().is_empty());
        hub.poll_once().await.unwrap();
        hub.poll_once().await.unwrap();
        assert_eq!(hub.latest_readings().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_actuator_is_not_found() {
        let command = ActuatorCommand {
            actuator: String::new(),
            command: "stir".into(),
            parameters: serde_json::Value::Null,
        };
        let err = hub().actuate("mixer", &command).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceNotFound);

        let err = hub().actuate("oven", &command).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotImplemented);
    }
}
