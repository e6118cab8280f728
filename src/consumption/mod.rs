// ABOUTME: Consumption and waste tracking: per-user profiles, portion suggestions, demand forecast
// ABOUTME: Independent of cooking sessions; re-exports the types used by the HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Portion adjustment suggestions and log entries
pub mod adjustment;
/// Demand forecasting strategies
pub mod forecast;
/// Consumption profile, records and rolling windows
pub mod profile;
/// Consumption service used by the routes
pub mod service;

pub use adjustment::{AdjustmentLogEntry, PortionAdjustmentSuggestion};
pub use forecast::{DemandForecast, DemandForecaster, MovingAverageForecaster};
pub use profile::{
    ConsumptionProfile, ConsumptionRecord, ConsumptionSettings, ProfileSummary, RecordOutcome,
    RollingWindow, Season, SettingsUpdate,
};
pub use service::ConsumptionService;
