// ABOUTME: Simulated kitchen devices: a noisy multi-sensor source and actuators that are not wired up
// ABOUTME: Lets the service run end to end without physical hardware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use autofood_core::constants::hardware::{
    SIMULATED_BASE_HUMIDITY_PCT, SIMULATED_BASE_TEMPERATURE_C, SIMULATED_BASE_WEIGHT_G,
};
use autofood_core::errors::{AppError, AppResult};
use autofood_core::models::SensorKind;
use chrono::Utc;
use rand::Rng;
use tracing::warn;

use super::{ActuatorCommand, ActuatorSink, SensorSample, SensorSource};

/// Temperature, humidity and weight around fixed base values
#[derive(Debug, Clone)]
pub struct SimulatedSensorSource {
    name: String,
}

impl SimulatedSensorSource {
    /// Create a simulated source
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn jittered(base: f64, spread: f64) -> f64 {
        base + rand::thread_rng().gen_range(-spread..=spread)
    }
}

#[async_trait]
impl SensorSource for SimulatedSensorSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> AppResult<Vec<SensorSample>> {
        let read_at = Utc::now();
        let sample = |sensor, value| SensorSample {
            sensor,
            value,
            source: self.name.clone(),
            read_at,
        };
        Ok(vec![
            sample(
                SensorKind::Temperature,
                Self::jittered(SIMULATED_BASE_TEMPERATURE_C, 5.0),
            ),
            sample(
                SensorKind::Humidity,
                Self::jittered(SIMULATED_BASE_HUMIDITY_PCT, 3.0),
            ),
            sample(
                SensorKind::Weight,
                Self::jittered(SIMULATED_BASE_WEIGHT_G, 10.0),
            ),
        ])
    }
}

/// Actuator placeholder that rejects every command with `NOT_IMPLEMENTED`
#[derive(Debug, Clone)]
pub struct UnavailableActuator {
    name: String,
}

impl UnavailableActuator {
    /// Create a placeholder actuator
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl ActuatorSink for UnavailableActuator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, command: &ActuatorCommand) -> AppResult<()> {
        warn!(actuator = %self.name, command = %command.command, "Actuator is not connected");
        Err(AppError::not_implemented(format!("Actuator '{}'", self.name))
            .with_resource_id(self.name.clone()))
    }
}
