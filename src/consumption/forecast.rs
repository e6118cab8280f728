// ABOUTME: Demand forecasting strategy trait and the naive moving-average implementation
// ABOUTME: Projects ingredient demand from recent consumption with seasonal and trend ratios
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Demand Forecast
//!
//! [`MovingAverageForecaster`] is a placeholder estimator, not a validated
//! time-series model:
//!
//! ```text
//! daily    = sum(consumed, last 30 days) / 30
//! seasonal = mean(consumed, target season, last 365 days) / mean(consumed, last 365 days)
//! trend    = mean(consumed, last 30 days) / mean(consumed, days 30..90 ago)
//! demand   = daily * days_ahead * seasonal * trend
//! ```
//!
//! A ratio whose denominator is missing or zero is 1.0. Confidence blends the
//! sample count with the coefficient of variation of the last 30 days and is
//! clamped to `[0.1, 0.95]`.

use autofood_core::constants::consumption::{
    FORECAST_MAX_CONFIDENCE, FORECAST_MIN_CONFIDENCE, FORECAST_PRIOR_DAYS, FORECAST_RECENT_DAYS,
    FORECAST_YEAR_DAYS,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use super::profile::{ConsumptionRecord, Season};

/// Projected demand for one ingredient
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandForecast {
    /// Ingredient key
    pub ingredient: String,
    /// Horizon in days
    pub days_ahead: u32,
    /// Projected total consumption over the horizon
    pub predicted_quantity: f64,
    /// Average daily consumption over the last 30 days
    pub daily_rate: f64,
    /// Seasonal correction applied
    pub seasonal_factor: f64,
    /// Trend correction applied
    pub trend_factor: f64,
    /// Heuristic confidence in `[0.1, 0.95]`
    pub confidence: f64,
    /// Records inside the 30-day window
    pub sample_size: usize,
    /// Season of the horizon's end
    pub target_season: Season,
    /// Strategy that produced the forecast
    pub method: &'static str,
    /// When the forecast was made
    pub generated_at: DateTime<Utc>,
}

/// Pluggable demand forecasting strategy
pub trait DemandForecaster: Send + Sync {
    /// Strategy label reported with each forecast
    fn name(&self) -> &'static str;

    /// Forecast demand of `ingredient` from its `history`
    fn forecast(
        &self,
        ingredient: &str,
        history: &[&ConsumptionRecord],
        days_ahead: u32,
        now: DateTime<Utc>,
    ) -> DemandForecast;
}

/// Moving average with seasonal and trend ratios
#[derive(Debug, Default, Clone, Copy)]
pub struct MovingAverageForecaster;

impl DemandForecaster for MovingAverageForecaster {
    fn name(&self) -> &'static str {
        "moving_average"
    }

    fn forecast(
        &self,
        ingredient: &str,
        history: &[&ConsumptionRecord],
        days_ahead: u32,
        now: DateTime<Utc>,
    ) -> DemandForecast {
        let recent_start = now - TimeDelta::days(FORECAST_RECENT_DAYS);
        let prior_start = recent_start - TimeDelta::days(FORECAST_PRIOR_DAYS);
        let year_start = now - TimeDelta::days(FORECAST_YEAR_DAYS);
        let target_season = Season::of(now + TimeDelta::days(i64::from(days_ahead)));

        let consumed_between = |from: DateTime<Utc>, to: DateTime<Utc>| -> Vec<f64> {
            history
                .iter()
                .filter(|r| r.recorded_at > from && r.recorded_at <= to)
                .map(|r| r.portion_consumed)
                .collect()
        };

        let recent = consumed_between(recent_start, now);
        let prior = consumed_between(prior_start, recent_start);
        let year = consumed_between(year_start, now);
        let seasonal_sample: Vec<f64> = history
            .iter()
            .filter(|r| r.recorded_at > year_start && r.recorded_at <= now)
            .filter(|r| r.season == target_season)
            .map(|r| r.portion_consumed)
            .collect();

        let daily_rate = recent.iter().sum::<f64>() / FORECAST_RECENT_DAYS as f64;
        let seasonal_factor = ratio(mean(&seasonal_sample), mean(&year));
        let trend_factor = ratio(mean(&recent), mean(&prior));
        let predicted_quantity =
            daily_rate * f64::from(days_ahead) * seasonal_factor * trend_factor;

        DemandForecast {
            ingredient: ingredient.to_owned(),
            days_ahead,
            predicted_quantity,
            daily_rate,
            seasonal_factor,
            trend_factor,
            confidence: confidence(&recent),
            sample_size: recent.len(),
            target_season,
            method: self.name(),
            generated_at: now,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d > 0.0 => n / d,
        _ => 1.0,
    }
}

fn confidence(sample: &[f64]) -> f64 {
    let coverage = (sample.len() as f64 / FORECAST_RECENT_DAYS as f64).min(1.0);
    let cv = match mean(sample) {
        Some(m) if m > 0.0 && sample.len() > 1 => {
            let variance =
                sample.iter().map(|v| (v - m).powi(2)).sum::<f64>() / sample.len() as f64;
            variance.sqrt() / m
        }
        _ => 1.0,
    };
    0.5f64
        .mul_add(coverage, 0.5 * (1.0 - cv.min(1.0)))
        .clamp(FORECAST_MIN_CONFIDENCE, FORECAST_MAX_CONFIDENCE)
}
