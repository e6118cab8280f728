// ABOUTME: Cooking session vocabulary shared by the state machine and the error types
// ABOUTME: Defines SessionStatus, AutomationLevel, and SensorKind with string parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// Lifecycle state of a cooking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created, not started yet
    #[default]
    Initialized,
    /// Steps are being executed
    InProgress,
    /// Temporarily halted, may resume
    Paused,
    /// All steps done (terminal)
    Completed,
    /// Stopped before completion (terminal)
    Aborted,
}

impl SessionStatus {
    /// Completed and aborted sessions accept no further transitions
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    /// Wire name of the status
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::InProgress => "in_progress",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of a session is delegated to kitchen hardware
///
/// Only `Manual` changes behavior today: every other level routes sensor
/// readings through the session's automation hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AutomationLevel {
    /// The cook does everything
    #[default]
    Manual,
    /// Hardware suggests, the cook acts
    Assisted,
    /// Hardware acts on some steps
    #[serde(alias = "semi")]
    SemiAutomated,
    /// Hardware runs the whole recipe
    FullyAutomated,
}

impl AutomationLevel {
    /// Whether sensor readings should reach the automation hook
    #[must_use]
    pub const fn is_automated(&self) -> bool {
        !matches!(self, Self::Manual)
    }
}

impl FromStr for AutomationLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "manual" => Ok(Self::Manual),
            "assisted" => Ok(Self::Assisted),
            "semi" | "semi_automated" => Ok(Self::SemiAutomated),
            "fully_automated" | "full" | "automated" => Ok(Self::FullyAutomated),
            other => Err(AppError::invalid_input(format!(
                "unknown automation level '{other}'"
            ))),
        }
    }
}

/// Sensor type attached to a reading
///
/// Known kinds serialize to fixed names; anything else is kept verbatim in
/// `Custom` so new hardware can report without a schema change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorKind {
    /// Degrees Celsius
    Temperature,
    /// Relative humidity percent
    Humidity,
    /// Grams
    Weight,
    /// Acidity
    Ph,
    /// Anything else
    Custom(String),
}

impl SensorKind {
    /// Wire name of the sensor kind
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Weight => "weight",
            Self::Ph => "ph",
            Self::Custom(name) => name,
        }
    }
}

impl FromStr for SensorKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AppError::missing_field("sensorType"));
        }
        Ok(match normalized.as_str() {
            "temperature" | "temp" => Self::Temperature,
            "humidity" => Self::Humidity,
            "weight" => Self::Weight,
            "ph" => Self::Ph,
            _ => Self::Custom(normalized),
        })
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SensorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SensorKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Aborted.is_terminal());
        assert!(!SessionStatus::Paused.is_terminal());
    }

    #[test]
    fn test_automation_level_parsing() {
        assert_eq!(
            "semi".parse::<AutomationLevel>().unwrap(),
            AutomationLevel::SemiAutomated
        );
        assert_eq!(
            "fully-automated".parse::<AutomationLevel>().unwrap(),
            AutomationLevel::FullyAutomated
        );
        assert!("robotic".parse::<AutomationLevel>().is_err());
    }

    #[test]
    fn test_sensor_kind_keeps_custom_names() {
        let kind: SensorKind = serde_json::from_str("\"Probe_Core\"").unwrap();
        assert_eq!(kind, SensorKind::Custom("probe_core".into()));
        assert_eq!(serde_json::to_string(&SensorKind::Ph).unwrap(), "\"ph\"");
    }
}
