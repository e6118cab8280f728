// ABOUTME: Per-user consumption profile with waste history, rolling windows, and portion settings
// ABOUTME: Records served versus consumed portions and derives portion adjustment suggestions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Consumption Profile
//!
//! Every recorded meal goes to two places:
//!
//! - the full history (append-only, unbounded), used by the demand forecaster
//! - the rolling window of the ingredient (last 30 waste percentages, FIFO),
//!   used for the profile-wide average waste rate and adjustment checks
//!
//! Suggestions are stored as pending and only change a portion once
//! [`ConsumptionProfile::apply_adjustment`] is called.

use autofood_core::constants::consumption::{
    ADJUSTMENT_SAMPLE_SIZE, DEFAULT_MAX_ADJUSTMENT_PCT, DEFAULT_WASTE_THRESHOLD_PCT,
    MIN_SAMPLES_FOR_ADJUSTMENT, ROLLING_WINDOW_CAPACITY,
};
use autofood_core::errors::{AppError, AppResult, ConsumptionError};
use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info};

use super::adjustment::{AdjustmentLogEntry, PortionAdjustmentSuggestion};

/// Ingredient keys are case and whitespace insensitive
#[must_use]
pub fn normalize_ingredient(ingredient: &str) -> String {
    ingredient.trim().to_lowercase()
}

/// Meteorological season (northern hemisphere)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// December to February
    Winter,
    /// March to May
    Spring,
    /// June to August
    Summer,
    /// September to November
    Autumn,
}

impl Season {
    /// Season a calendar month (1-12) falls in
    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    /// Season of a timestamp
    #[must_use]
    pub fn of(at: DateTime<Utc>) -> Self {
        Self::from_month(at.month())
    }
}

/// Per-profile tuning of the waste tracker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionSettings {
    /// Portion changes need explicit user approval
    pub requires_consultation: bool,
    /// Mean waste above this percentage triggers a suggestion
    pub waste_threshold_pct: f64,
    /// Largest reduction one suggestion may propose, in percent
    pub max_adjustment_pct: f64,
}

impl Default for ConsumptionSettings {
    fn default() -> Self {
        Self {
            requires_consultation: true,
            waste_threshold_pct: DEFAULT_WASTE_THRESHOLD_PCT,
            max_adjustment_pct: DEFAULT_MAX_ADJUSTMENT_PCT,
        }
    }
}

impl ConsumptionSettings {
    /// Check that both percentages lie within `0..=100`
    ///
    /// # Errors
    /// Returns `ValueOutOfRange` naming the offending field.
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("wasteThresholdPct", self.waste_threshold_pct),
            ("maxAdjustmentPct", self.max_adjustment_pct),
        ] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(AppError::out_of_range(
                    field,
                    format!("{field} must be between 0 and 100, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Partial settings change; absent fields keep their value
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    /// New consultation requirement
    pub requires_consultation: Option<bool>,
    /// New waste threshold
    pub waste_threshold_pct: Option<f64>,
    /// New per-cycle adjustment cap
    pub max_adjustment_pct: Option<f64>,
}

impl SettingsUpdate {
    /// Settings that result from applying this update to `base`
    ///
    /// # Errors
    /// Returns a validation error if the result is out of range.
    pub fn applied_to(&self, base: ConsumptionSettings) -> AppResult<ConsumptionSettings> {
        let settings = ConsumptionSettings {
            requires_consultation: self
                .requires_consultation
                .unwrap_or(base.requires_consultation),
            waste_threshold_pct: self.waste_threshold_pct.unwrap_or(base.waste_threshold_pct),
            max_adjustment_pct: self.max_adjustment_pct.unwrap_or(base.max_adjustment_pct),
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// One served-versus-consumed observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionRecord {
    /// Normalized ingredient key
    pub ingredient: String,
    /// Mass served
    pub portion_served: f64,
    /// Mass eaten
    pub portion_consumed: f64,
    /// `portion_served - portion_consumed`
    pub waste_amount: f64,
    /// Waste as a percentage of the served portion
    pub waste_percentage: f64,
    /// When the meal took place
    pub recorded_at: DateTime<Utc>,
    /// Weekday of `recorded_at`
    pub day_of_week: Weekday,
    /// Season of `recorded_at`
    pub season: Season,
}

impl ConsumptionRecord {
    /// Validate an observation and derive its waste figures
    ///
    /// # Errors
    /// `InvalidRecord` for a blank ingredient, a non-positive served portion,
    /// a negative consumed portion, or more consumed than served.
    pub fn new(
        ingredient: &str,
        portion_served: f64,
        portion_consumed: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, ConsumptionError> {
        let ingredient = normalize_ingredient(ingredient);
        if ingredient.is_empty() {
            return Err(ConsumptionError::invalid_record(
                "ingredient",
                "ingredient must not be blank",
            ));
        }
        if !portion_served.is_finite() || portion_served <= 0.0 {
            return Err(ConsumptionError::invalid_record(
                "portionServed",
                format!("portion served must be positive, got {portion_served}"),
            ));
        }
        if !portion_consumed.is_finite() || portion_consumed < 0.0 {
            return Err(ConsumptionError::invalid_record(
                "portionConsumed",
                format!("portion consumed must not be negative, got {portion_consumed}"),
            ));
        }
        if portion_consumed > portion_served {
            return Err(ConsumptionError::invalid_record(
                "portionConsumed",
                format!(
                    "portion consumed ({portion_consumed}) exceeds portion served ({portion_served})"
                ),
            ));
        }

        let waste_amount = portion_served - portion_consumed;
        Ok(Self {
            ingredient,
            portion_served,
            portion_consumed,
            waste_amount,
            waste_percentage: waste_amount * 100.0 / portion_served,
            recorded_at,
            day_of_week: recorded_at.weekday(),
            season: Season::of(recorded_at),
        })
    }
}

/// Fixed-capacity FIFO of waste percentages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingWindow {
    values: VecDeque<f64>,
    #[serde(skip)]
    capacity: usize,
}

impl RollingWindow {
    /// Create an empty window holding at most `capacity` values
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Append a value, evicting the oldest when full
    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Number of values held
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the window is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of all values
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Mean of all values
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.sum() / self.len() as f64)
    }

    /// Mean of the `n` most recent values, `None` unless at least `n` exist
    #[must_use]
    pub fn mean_of_last(&self, n: usize) -> Option<f64> {
        if n == 0 || self.values.len() < n {
            return None;
        }
        let sum: f64 = self.values.iter().rev().take(n).sum();
        Some(sum / n as f64)
    }
}

/// Outcome of recording one observation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOutcome {
    /// The stored record
    pub record: ConsumptionRecord,
    /// Profile-wide average waste rate after the record
    pub average_waste_rate: f64,
    /// Suggestion produced by the adjustment check, if any
    pub suggestion: Option<PortionAdjustmentSuggestion>,
}

/// Per-ingredient view in a profile summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientSummary {
    /// Ingredient key
    pub ingredient: String,
    /// Entries in the rolling window
    pub window_size: usize,
    /// Mean of the rolling window
    pub mean_waste_pct: Option<f64>,
    /// Portion set by the last applied adjustment
    pub current_portion: Option<f64>,
    /// Suggestion waiting for approval
    pub pending_suggestion: Option<PortionAdjustmentSuggestion>,
}

/// Read-only view of a profile returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    /// Owner
    pub user_id: String,
    /// Current settings
    pub settings: ConsumptionSettings,
    /// Mean over every rolling-window entry of every ingredient
    pub average_waste_rate: f64,
    /// Number of records in the full history
    pub record_count: usize,
    /// Per-ingredient breakdown
    pub ingredients: Vec<IngredientSummary>,
    /// Applied adjustments, oldest first
    pub adjustment_log: Vec<AdjustmentLogEntry>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
}

/// Consumption history and portion state of one user
#[derive(Debug, Clone)]
pub struct ConsumptionProfile {
    user_id: String,
    settings: ConsumptionSettings,
    history: Vec<ConsumptionRecord>,
    windows: BTreeMap<String, RollingWindow>,
    average_waste_rate: f64,
    current_portions: BTreeMap<String, f64>,
    pending_suggestions: BTreeMap<String, PortionAdjustmentSuggestion>,
    adjustment_log: Vec<AdjustmentLogEntry>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConsumptionProfile {
    /// Create an empty profile
    #[must_use]
    pub fn new(user_id: impl Into<String>, settings: ConsumptionSettings, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            settings,
            history: Vec::new(),
            windows: BTreeMap::new(),
            average_waste_rate: 0.0,
            current_portions: BTreeMap::new(),
            pending_suggestions: BTreeMap::new(),
            adjustment_log: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Owner of the profile
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Current settings
    #[must_use]
    pub const fn settings(&self) -> &ConsumptionSettings {
        &self.settings
    }

    /// Replace the settings
    pub fn set_settings(&mut self, settings: ConsumptionSettings, now: DateTime<Utc>) {
        self.settings = settings;
        self.updated_at = now;
    }

    /// Mean over every rolling-window entry of every ingredient
    #[must_use]
    pub const fn average_waste_rate(&self) -> f64 {
        self.average_waste_rate
    }

    /// Full history, oldest first
    #[must_use]
    pub fn history(&self) -> &[ConsumptionRecord] {
        &self.history
    }

    /// History of one ingredient, oldest first
    #[must_use]
    pub fn ingredient_history(&self, ingredient: &str) -> Vec<&ConsumptionRecord> {
        let key = normalize_ingredient(ingredient);
        self.history.iter().filter(|r| r.ingredient == key).collect()
    }

    /// Rolling window of an ingredient
    #[must_use]
    pub fn window(&self, ingredient: &str) -> Option<&RollingWindow> {
        self.windows.get(&normalize_ingredient(ingredient))
    }

    /// Portion set by the last applied adjustment
    #[must_use]
    pub fn current_portion(&self, ingredient: &str) -> Option<f64> {
        self.current_portions
            .get(&normalize_ingredient(ingredient))
            .copied()
    }

    /// Whether anything is known about the ingredient
    #[must_use]
    pub fn knows_ingredient(&self, ingredient: &str) -> bool {
        let key = normalize_ingredient(ingredient);
        self.windows.contains_key(&key) || self.current_portions.contains_key(&key)
    }

    /// Applied adjustments, oldest first
    #[must_use]
    pub fn adjustment_log(&self) -> &[AdjustmentLogEntry] {
        &self.adjustment_log
    }

    /// Record a meal and run the adjustment check for its ingredient
    ///
    /// # Errors
    /// `InvalidRecord` if the observation fails validation; the profile is
    /// left untouched in that case.
    pub fn record_consumption(
        &mut self,
        ingredient: &str,
        portion_served: f64,
        portion_consumed: f64,
        recorded_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<RecordOutcome, ConsumptionError> {
        let record =
            ConsumptionRecord::new(ingredient, portion_served, portion_consumed, recorded_at)?;

        self.windows
            .entry(record.ingredient.clone())
            .or_insert_with(|| RollingWindow::new(ROLLING_WINDOW_CAPACITY))
            .push(record.waste_percentage);
        self.history.push(record.clone());
        self.recompute_average();
        self.updated_at = now;

        debug!(
            user_id = %self.user_id,
            ingredient = %record.ingredient,
            waste_pct = record.waste_percentage,
            "Consumption recorded"
        );

        let suggestion = self.check_for_adjustment(&record.ingredient, now);
        Ok(RecordOutcome {
            record,
            average_waste_rate: self.average_waste_rate,
            suggestion,
        })
    }

    /// Produce a suggestion if recent waste of `ingredient` is above the threshold
    ///
    /// Needs at least five window entries and looks at the five most recent.
    /// The suggestion replaces any pending one for the ingredient; nothing is
    /// applied.
    pub fn check_for_adjustment(
        &mut self,
        ingredient: &str,
        now: DateTime<Utc>,
    ) -> Option<PortionAdjustmentSuggestion> {
        let key = normalize_ingredient(ingredient);
        let window = self.windows.get(&key)?;
        if window.len() < MIN_SAMPLES_FOR_ADJUSTMENT {
            return None;
        }
        let mean = window.mean_of_last(ADJUSTMENT_SAMPLE_SIZE)?;
        if mean <= self.settings.waste_threshold_pct {
            return None;
        }

        let current_portion = self.current_portions.get(&key).copied().or_else(|| {
            self.history
                .iter()
                .rev()
                .find(|r| r.ingredient == key)
                .map(|r| r.portion_served)
        })?;

        let suggestion = PortionAdjustmentSuggestion::compute(
            &key,
            current_portion,
            mean,
            ADJUSTMENT_SAMPLE_SIZE,
            &self.settings,
            now,
        );
        info!(
            user_id = %self.user_id,
            ingredient = %key,
            mean_waste_pct = mean,
            current_portion,
            suggested_portion = suggestion.suggested_portion,
            "Portion adjustment suggested"
        );
        self.pending_suggestions.insert(key, suggestion.clone());
        Some(suggestion)
    }

    /// Pending suggestion for an ingredient
    ///
    /// # Errors
    /// `IngredientNotFound` if the profile knows nothing about the ingredient.
    pub fn pending_suggestion(
        &self,
        ingredient: &str,
    ) -> Result<Option<&PortionAdjustmentSuggestion>, ConsumptionError> {
        let key = normalize_ingredient(ingredient);
        if !self.knows_ingredient(&key) {
            return Err(ConsumptionError::ingredient_not_found(key));
        }
        Ok(self.pending_suggestions.get(&key))
    }

    /// Set a new portion for an ingredient
    ///
    /// # Errors
    /// `InvalidRecord` for a non-positive portion, `IngredientNotFound` for an
    /// ingredient without history, `ConsultationRequired` when the profile
    /// requires consultation and the change is not approved. On error the
    /// current portion is unchanged.
    pub fn apply_adjustment(
        &mut self,
        ingredient: &str,
        new_portion: f64,
        user_approved: bool,
        now: DateTime<Utc>,
    ) -> Result<AdjustmentLogEntry, ConsumptionError> {
        let key = normalize_ingredient(ingredient);
        if !new_portion.is_finite() || new_portion <= 0.0 {
            return Err(ConsumptionError::invalid_record(
                "newPortion",
                format!("new portion must be positive, got {new_portion}"),
            ));
        }
        if !self.knows_ingredient(&key) {
            return Err(ConsumptionError::ingredient_not_found(key));
        }

        let old_portion = self.current_portions.get(&key).copied();
        if self.settings.requires_consultation && !user_approved {
            return Err(ConsumptionError::ConsultationRequired {
                ingredient: key,
                current_portion: old_portion,
                requested_portion: new_portion,
            });
        }

        let entry = AdjustmentLogEntry::new(&key, old_portion, new_portion, user_approved, now);
        self.current_portions.insert(key.clone(), new_portion);
        self.pending_suggestions.remove(&key);
        self.adjustment_log.push(entry.clone());
        self.updated_at = now;

        info!(
            user_id = %self.user_id,
            ingredient = %key,
            old_portion = ?old_portion,
            new_portion,
            "Portion adjustment applied"
        );
        Ok(entry)
    }

    /// Read-only view for the API
    #[must_use]
    pub fn summary(&self) -> ProfileSummary {
        let mut keys: Vec<&String> = self
            .windows
            .keys()
            .chain(self.current_portions.keys())
            .collect();
        keys.sort();
        keys.dedup();

        let ingredients = keys
            .into_iter()
            .map(|key| {
                let window = self.windows.get(key);
                IngredientSummary {
                    ingredient: key.clone(),
                    window_size: window.map_or(0, RollingWindow::len),
                    mean_waste_pct: window.and_then(RollingWindow::mean),
                    current_portion: self.current_portions.get(key).copied(),
                    pending_suggestion: self.pending_suggestions.get(key).cloned(),
                }
            })
            .collect();

        ProfileSummary {
            user_id: self.user_id.clone(),
            settings: self.settings,
            average_waste_rate: self.average_waste_rate,
            record_count: self.history.len(),
            ingredients,
            adjustment_log: self.adjustment_log.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn recompute_average(&mut self) {
        let (sum, count) = self
            .windows
            .values()
            .fold((0.0, 0_usize), |(sum, count), w| (sum + w.sum(), count + w.len()));
        self.average_waste_rate = if count == 0 { 0.0 } else { sum / count as f64 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ConsumptionProfile {
        ConsumptionProfile::new("u-1", ConsumptionSettings::default(), Utc::now())
    }

    #[test]
    fn test_waste_percentage() {
        let record = ConsumptionRecord::new("Lettuce ", 80.0, 60.0, Utc::now()).unwrap();
        assert_eq!(record.ingredient, "lettuce");
        assert!((record.waste_amount - 20.0).abs() < 1e-9);
        assert!((record.waste_percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_consumed_above_served_is_rejected() {
        let err = ConsumptionRecord::new("rice", 100.0, 120.0, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            ConsumptionError::InvalidRecord {
                field: "portionConsumed",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_served_is_rejected() {
        assert!(ConsumptionRecord::new("rice", 0.0, 0.0, Utc::now()).is_err());
    }

    #[test]
    fn test_rolling_window_is_fifo() {
        let mut window = RollingWindow::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            window.push(v);
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.mean(), Some(3.0));
        assert_eq!(window.mean_of_last(2), Some(3.5));
        assert_eq!(window.mean_of_last(4), None);
    }

    #[test]
    fn test_average_spans_all_ingredients() {
        let mut profile = profile();
        let now = Utc::now();
        profile.record_consumption("rice", 100.0, 90.0, now, now).unwrap();
        profile.record_consumption("beans", 100.0, 70.0, now, now).unwrap();
        assert!((profile.average_waste_rate() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_suggestion_below_min_samples() {
        let mut profile = profile();
        let now = Utc::now();
        for _ in 0..4 {
            let outcome = profile
                .record_consumption("lettuce", 100.0, 50.0, now, now)
                .unwrap();
            assert!(outcome.suggestion.is_none());
        }
    }

    #[test]
    fn test_low_waste_gives_no_suggestion() {
        let mut profile = profile();
        let now = Utc::now();
        for _ in 0..6 {
            profile.record_consumption("rice", 100.0, 90.0, now, now).unwrap();
        }
        assert!(profile.pending_suggestion("rice").unwrap().is_none());
    }

    #[test]
    fn test_approved_adjustment_clears_pending() {
        let mut profile = profile();
        let now = Utc::now();
        for _ in 0..5 {
            profile.record_consumption("lettuce", 100.0, 70.0, now, now).unwrap();
        }
        assert!(profile.pending_suggestion("lettuce").unwrap().is_some());

        let entry = profile.apply_adjustment("lettuce", 80.0, true, now).unwrap();
        assert_eq!(entry.old_portion, None);
        assert_eq!(profile.current_portion("lettuce"), Some(80.0));
        assert!(profile.pending_suggestion("lettuce").unwrap().is_none());
    }

    #[test]
    fn test_unknown_ingredient() {
        let mut profile = profile();
        assert!(matches!(
            profile.apply_adjustment("kale", 50.0, true, Utc::now()),
            Err(ConsumptionError::IngredientNotFound { .. })
        ));
    }

    #[test]
    fn test_settings_update_validates() {
        let update = SettingsUpdate {
            waste_threshold_pct: Some(150.0),
            ..SettingsUpdate::default()
        };
        assert!(update.applied_to(ConsumptionSettings::default()).is_err());
    }
}
