// ABOUTME: Consumption service resolving per-user profiles from storage and applying tracker operations
// ABOUTME: Auto-creates profiles on first record and exposes suggestions, adjustments, and forecasts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use autofood_core::constants::consumption::FORECAST_MAX_DAYS_AHEAD;
use autofood_core::errors::{AppError, AppResult, ConsumptionError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use super::adjustment::{AdjustmentLogEntry, PortionAdjustmentSuggestion};
use super::forecast::{DemandForecast, DemandForecaster};
use super::profile::{
    normalize_ingredient, ConsumptionProfile, ConsumptionRecord, ConsumptionSettings,
    ProfileSummary, RecordOutcome, SettingsUpdate,
};
use crate::storage::{Repository, Shared};

/// Entry point for everything the HTTP layer does with consumption data
#[derive(Clone)]
pub struct ConsumptionService {
    profiles: Arc<dyn Repository<String, ConsumptionProfile>>,
    defaults: ConsumptionSettings,
    forecaster: Arc<dyn DemandForecaster>,
}

impl ConsumptionService {
    /// Create a service; `defaults` seed every new profile
    #[must_use]
    pub fn new(
        profiles: Arc<dyn Repository<String, ConsumptionProfile>>,
        defaults: ConsumptionSettings,
        forecaster: Arc<dyn DemandForecaster>,
    ) -> Self {
        Self {
            profiles,
            defaults,
            forecaster,
        }
    }

    /// Settings given to new profiles
    #[must_use]
    pub const fn defaults(&self) -> &ConsumptionSettings {
        &self.defaults
    }

    /// Record a meal, creating the user's profile if needed
    ///
    /// # Errors
    /// A validation error for a blank user id or an invalid observation.
    pub async fn record_consumption(
        &self,
        user_id: &str,
        ingredient: &str,
        portion_served: f64,
        portion_consumed: f64,
        recorded_at: Option<DateTime<Utc>>,
    ) -> AppResult<RecordOutcome> {
        let user_id = validate_user_id(user_id)?;
        let now = Utc::now();

        // Validate before touching storage so a bad request never creates a profile
        ConsumptionRecord::new(
            ingredient,
            portion_served,
            portion_consumed,
            recorded_at.unwrap_or(now),
        )?;

        let (handle, created) = self
            .profiles
            .get_or_insert(
                user_id.to_owned(),
                ConsumptionProfile::new(user_id, self.defaults, now),
            )
            .await;
        if created {
            info!(user_id = %user_id, "Consumption profile created");
        }

        let mut profile = handle.lock().await;
        Ok(profile.record_consumption(
            ingredient,
            portion_served,
            portion_consumed,
            recorded_at.unwrap_or(now),
            now,
        )?)
    }

    /// Summary of a profile
    ///
    /// # Errors
    /// `ResourceNotFound` for unknown users.
    pub async fn profile(&self, user_id: &str) -> AppResult<ProfileSummary> {
        let handle = self.handle(user_id).await?;
        let profile = handle.lock().await;
        Ok(profile.summary())
    }

    /// Change the settings of a profile, creating it if needed
    ///
    /// # Errors
    /// A validation error if the resulting settings are out of range.
    pub async fn update_settings(
        &self,
        user_id: &str,
        update: SettingsUpdate,
    ) -> AppResult<ProfileSummary> {
        let user_id = validate_user_id(user_id)?;
        let now = Utc::now();
        // Reject before inserting anything
        update.applied_to(self.defaults)?;

        let (handle, _) = self
            .profiles
            .get_or_insert(
                user_id.to_owned(),
                ConsumptionProfile::new(user_id, self.defaults, now),
            )
            .await;
        let mut profile = handle.lock().await;
        let settings = update.applied_to(*profile.settings())?;
        profile.set_settings(settings, now);
        info!(user_id = %user_id, ?settings, "Consumption settings updated");
        Ok(profile.summary())
    }

    /// Pending adjustment suggestion for an ingredient
    ///
    /// # Errors
    /// `ResourceNotFound` for unknown users or ingredients.
    pub async fn suggestion(
        &self,
        user_id: &str,
        ingredient: &str,
    ) -> AppResult<Option<PortionAdjustmentSuggestion>> {
        let handle = self.handle(user_id).await?;
        let profile = handle.lock().await;
        Ok(profile.pending_suggestion(ingredient)?.cloned())
    }

    /// Apply a portion change
    ///
    /// # Errors
    /// `ResourceNotFound`, a validation error, or `ConsultationRequired`
    /// when approval is needed and missing.
    pub async fn apply_adjustment(
        &self,
        user_id: &str,
        ingredient: &str,
        new_portion: f64,
        user_approved: bool,
    ) -> AppResult<AdjustmentLogEntry> {
        let handle = self.handle(user_id).await?;
        let mut profile = handle.lock().await;
        Ok(profile.apply_adjustment(ingredient, new_portion, user_approved, Utc::now())?)
    }

    /// Forecast demand for an ingredient
    ///
    /// # Errors
    /// `ValueOutOfRange` for a horizon outside `1..=365`, `ResourceNotFound`
    /// for unknown users or ingredients without history.
    pub async fn forecast(
        &self,
        user_id: &str,
        ingredient: &str,
        days_ahead: u32,
    ) -> AppResult<DemandForecast> {
        if !(1..=FORECAST_MAX_DAYS_AHEAD).contains(&days_ahead) {
            return Err(AppError::out_of_range(
                "daysAhead",
                format!("daysAhead must be between 1 and {FORECAST_MAX_DAYS_AHEAD}"),
            ));
        }
        let handle = self.handle(user_id).await?;
        let profile = handle.lock().await;

        let key = normalize_ingredient(ingredient);
        let history = profile.ingredient_history(&key);
        if history.is_empty() {
            return Err(ConsumptionError::ingredient_not_found(key).into());
        }
        Ok(self.forecaster.forecast(&key, &history, days_ahead, Utc::now()))
    }

    /// Number of stored profiles
    pub async fn profile_count(&self) -> usize {
        self.profiles.len().await
    }

    async fn handle(&self, user_id: &str) -> AppResult<Shared<ConsumptionProfile>> {
        let user_id = validate_user_id(user_id)?;
        self.profiles
            .get(&user_id.to_owned())
            .await
            .ok_or_else(|| ConsumptionError::profile_not_found(user_id).into())
    }
}

fn validate_user_id(user_id: &str) -> AppResult<&str> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::missing_field("userId"));
    }
    Ok(user_id)
}
