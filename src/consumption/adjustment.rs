// ABOUTME: Portion adjustment suggestions derived from recent waste and the log of applied changes
// ABOUTME: Bounds every reduction by the per-cycle limit and a hard 50 percent cap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use autofood_core::constants::consumption::MAX_REDUCTION_FRACTION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::ConsumptionSettings;

/// Proposed portion change for one ingredient, never applied automatically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortionAdjustmentSuggestion {
    /// Ingredient key
    pub ingredient: String,
    /// Portion in effect when the suggestion was made
    pub current_portion: f64,
    /// Proposed new portion
    pub suggested_portion: f64,
    /// Proposed reduction as a percentage of the current portion
    pub reduction_pct: f64,
    /// Mean waste percentage of the samples that triggered it
    pub mean_waste_pct: f64,
    /// Number of samples the mean was taken over
    pub sample_size: usize,
    /// Whether applying it needs the user's approval
    pub requires_consultation: bool,
    /// When it was produced
    pub created_at: DateTime<Utc>,
}

impl PortionAdjustmentSuggestion {
    /// Build a suggestion that cuts the portion by the observed waste
    ///
    /// The reduction is `mean_waste_pct` of the current portion, capped by
    /// `max_adjustment_pct` and by half the portion.
    #[must_use]
    pub fn compute(
        ingredient: &str,
        current_portion: f64,
        mean_waste_pct: f64,
        sample_size: usize,
        settings: &ConsumptionSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let reduction = (mean_waste_pct / 100.0)
            .min(settings.max_adjustment_pct / 100.0)
            .min(MAX_REDUCTION_FRACTION)
            .max(0.0);

        Self {
            ingredient: ingredient.to_owned(),
            current_portion,
            suggested_portion: current_portion * (1.0 - reduction),
            reduction_pct: reduction * 100.0,
            mean_waste_pct,
            sample_size,
            requires_consultation: settings.requires_consultation,
            created_at: now,
        }
    }
}

/// One applied portion change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentLogEntry {
    /// Ingredient key
    pub ingredient: String,
    /// Portion before the change, if one had been set
    pub old_portion: Option<f64>,
    /// Portion after the change
    pub new_portion: f64,
    /// `new_portion - old_portion`, zero when there was no old portion
    pub delta: f64,
    /// Whether the user explicitly approved the change
    pub user_approved: bool,
    /// When the change was applied
    pub applied_at: DateTime<Utc>,
}

impl AdjustmentLogEntry {
    /// Record a change from `old_portion` to `new_portion`
    #[must_use]
    pub fn new(
        ingredient: &str,
        old_portion: Option<f64>,
        new_portion: f64,
        user_approved: bool,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ingredient: ingredient.to_owned(),
            old_portion,
            new_portion,
            delta: old_portion.map_or(0.0, |old| new_portion - old),
            user_approved,
            applied_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduction_capped_by_max_adjustment() {
        let settings = ConsumptionSettings::default();
        let suggestion =
            PortionAdjustmentSuggestion::compute("lettuce", 100.0, 30.0, 5, &settings, Utc::now());
        assert!((suggestion.suggested_portion - 80.0).abs() < 1e-9);
        assert!((suggestion.reduction_pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_reduction_never_exceeds_half() {
        let settings = ConsumptionSettings {
            max_adjustment_pct: 90.0,
            ..ConsumptionSettings::default()
        };
        let suggestion =
            PortionAdjustmentSuggestion::compute("rice", 200.0, 80.0, 5, &settings, Utc::now());
        assert!((suggestion.suggested_portion - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_waste_gives_small_reduction() {
        let settings = ConsumptionSettings::default();
        let suggestion =
            PortionAdjustmentSuggestion::compute("beans", 100.0, 16.0, 5, &settings, Utc::now());
        assert!((suggestion.suggested_portion - 84.0).abs() < 1e-9);
    }
}
