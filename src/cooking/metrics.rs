// ABOUTME: Quality metrics recorded during a cooking session
// ABOUTME: Known metric kinds with validated values plus an open extension map
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Quality metrics
//!
//! A metric is stored under its name with the step it was taken at. Writes
//! are last-write-wins: recording a metric again replaces the previous value
//! and no history is kept.
//!
//! Known metrics (`internal_temperature`, `doneness`, `moisture`, `browning`)
//! are validated; any other name lands in the extension map unchecked.

use autofood_core::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Metrics the service knows how to validate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnownMetric {
    /// Core temperature in Celsius
    InternalTemperature,
    /// 0.0 (raw) to 1.0 (done)
    Doneness,
    /// Water content percent
    Moisture,
    /// Free-form browning description or score
    Browning,
}

impl KnownMetric {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InternalTemperature => "internal_temperature",
            Self::Doneness => "doneness",
            Self::Moisture => "moisture",
            Self::Browning => "browning",
        }
    }

    /// Look up a known metric by name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "internal_temperature" | "temperature" => Some(Self::InternalTemperature),
            "doneness" => Some(Self::Doneness),
            "moisture" => Some(Self::Moisture),
            "browning" => Some(Self::Browning),
            _ => None,
        }
    }

    fn validate(self, value: &MetricValue) -> AppResult<()> {
        let in_range = |low: f64, high: f64| match value {
            MetricValue::Number(n) if (low..=high).contains(n) => Ok(()),
            MetricValue::Number(n) => Err(AppError::out_of_range(
                self.as_str(),
                format!("{} must be between {low} and {high}, got {n}", self.as_str()),
            )),
            _ => Err(AppError::invalid_input(format!(
                "{} must be numeric",
                self.as_str()
            ))),
        };

        match self {
            Self::InternalTemperature => in_range(-50.0, 400.0),
            Self::Doneness => in_range(0.0, 1.0),
            Self::Moisture => in_range(0.0, 100.0),
            Self::Browning => match value {
                MetricValue::Flag(_) => Err(AppError::invalid_input(
                    "browning must be a score or a description",
                )),
                _ => Ok(()),
            },
        }
    }
}

/// Value of a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Numeric measurement
    Number(f64),
    /// Boolean check
    Flag(bool),
    /// Free-form observation
    Text(String),
}

/// Stored metric value with when and where it was taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricEntry {
    /// Value
    pub value: MetricValue,
    /// When it was recorded
    pub recorded_at: DateTime<Utc>,
    /// Session step index at the time
    pub step_index: usize,
}

/// Last-write-wins metric store of a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityMetrics {
    known: BTreeMap<KnownMetric, MetricEntry>,
    extensions: BTreeMap<String, MetricEntry>,
}

impl QualityMetrics {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` under `name`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank names or values out of range
    /// for a known metric.
    pub fn record(
        &mut self,
        name: &str,
        value: MetricValue,
        step_index: usize,
        now: DateTime<Utc>,
    ) -> AppResult<MetricEntry> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(AppError::missing_field("name"));
        }
        if let MetricValue::Number(n) = value {
            if !n.is_finite() {
                return Err(AppError::invalid_input("metric value must be finite"));
            }
        }

        let entry = MetricEntry {
            value,
            recorded_at: now,
            step_index,
        };

        if let Some(known) = KnownMetric::from_name(&name) {
            known.validate(&entry.value)?;
            self.known.insert(known, entry.clone());
        } else {
            self.extensions.insert(name, entry.clone());
        }
        Ok(entry)
    }

    /// Current value of a metric
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetricEntry> {
        let name = name.trim().to_lowercase();
        KnownMetric::from_name(&name).map_or_else(
            || self.extensions.get(&name),
            |known| self.known.get(&known),
        )
    }

    /// Number of distinct metrics recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len() + self.extensions.len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for QualityMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (metric, entry) in &self.known {
            map.serialize_entry(metric.as_str(), entry)?;
        }
        for (name, entry) in &self.extensions {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut metrics = QualityMetrics::new();
        let now = Utc::now();
        metrics
            .record("doneness", MetricValue::Number(0.4), 1, now)
            .unwrap();
        metrics
            .record("Doneness", MetricValue::Number(0.9), 3, now)
            .unwrap();

        let entry = metrics.get("doneness").unwrap();
        assert_eq!(entry.value, MetricValue::Number(0.9));
        assert_eq!(entry.step_index, 3);
        assert_eq!(metrics.len(), 1);
    }

    #[test]
    fn test_known_metric_is_validated() {
        let mut metrics = QualityMetrics::new();
        let err = metrics
            .record("doneness", MetricValue::Number(1.5), 0, Utc::now())
            .unwrap_err();
        assert_eq!(err.code, autofood_core::errors::ErrorCode::ValueOutOfRange);
        assert!(metrics.is_empty());
    }

    #[test]
    fn test_unknown_metric_goes_to_extensions() {
        let mut metrics = QualityMetrics::new();
        metrics
            .record("crust_crackle", MetricValue::Flag(true), 2, Utc::now())
            .unwrap();
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["crust_crackle"]["value"], true);
    }
}
