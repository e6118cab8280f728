// ABOUTME: Consumption tracking constants for waste windows and adjustment bounds
// ABOUTME: Defaults for rolling windows, thresholds, and forecast heuristics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Capacity of the per-ingredient rolling waste window
pub const ROLLING_WINDOW_CAPACITY: usize = 30;

/// Rolling entries needed before an adjustment is considered
pub const MIN_SAMPLES_FOR_ADJUSTMENT: usize = 5;

/// Number of most recent entries averaged by the adjustment check
pub const ADJUSTMENT_SAMPLE_SIZE: usize = 5;

/// Mean waste percentage above which a smaller portion is suggested
pub const DEFAULT_WASTE_THRESHOLD_PCT: f64 = 15.0;

/// Largest portion change one adjustment cycle may propose (percent of current)
pub const DEFAULT_MAX_ADJUSTMENT_PCT: f64 = 20.0;

/// Hard floor: a suggestion never cuts more than half of the current portion
pub const MAX_REDUCTION_FRACTION: f64 = 0.5;

/// Days of history behind the moving average
pub const FORECAST_RECENT_DAYS: i64 = 30;

/// Days of history the trend compares the recent window against
pub const FORECAST_PRIOR_DAYS: i64 = 60;

/// Days of history used for the seasonal and yearly averages
pub const FORECAST_YEAR_DAYS: i64 = 365;

/// Confidence bounds of the naive forecaster
pub const FORECAST_MIN_CONFIDENCE: f64 = 0.1;
/// Upper confidence bound of the naive forecaster
pub const FORECAST_MAX_CONFIDENCE: f64 = 0.95;

/// Longest horizon a forecast may be requested for
pub const FORECAST_MAX_DAYS_AHEAD: u32 = 365;
