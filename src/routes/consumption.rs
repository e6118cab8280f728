// ABOUTME: Consumption tracking route handlers
// ABOUTME: Records servings, exposes profiles, portion suggestions, adjustments, and forecasts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use autofood_core::errors::AppError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::{RequestContext, ValidJson, ValidPath, ValidQuery};
use crate::consumption::SettingsUpdate;
use crate::middleware::RequestId;
use crate::resources::ServerResources;

/// Horizon used when `daysAhead` is omitted
const DEFAULT_FORECAST_DAYS: u32 = 7;

/// Body of `POST /api/consumption/records`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordConsumptionRequest {
    /// Owner of the profile
    pub user_id: Option<String>,
    /// Ingredient name
    pub ingredient: Option<String>,
    /// Amount put on the plate
    pub portion_served: Option<f64>,
    /// Amount actually eaten
    pub portion_consumed: Option<f64>,
    /// When the meal happened; defaults to now
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body of `POST .../ingredients/:ingredient/adjustment`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyAdjustmentRequest {
    /// Portion to use from now on
    pub new_portion: Option<f64>,
    /// Explicit user approval
    #[serde(default)]
    pub user_approved: bool,
}

/// Query of `GET .../ingredients/:ingredient/forecast`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQuery {
    /// Forecast horizon in days
    pub days_ahead: Option<u32>,
}

/// Consumption tracking routes
pub struct ConsumptionRoutes;

impl ConsumptionRoutes {
    /// Create all consumption routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/consumption/records", post(Self::handle_record))
            .route(
                "/api/consumption/profiles/:user_id",
                get(Self::handle_get_profile).put(Self::handle_update_settings),
            )
            .route(
                "/api/consumption/profiles/:user_id/ingredients/:ingredient/suggestion",
                get(Self::handle_get_suggestion),
            )
            .route(
                "/api/consumption/profiles/:user_id/ingredients/:ingredient/adjustment",
                post(Self::handle_apply_adjustment),
            )
            .route(
                "/api/consumption/profiles/:user_id/ingredients/:ingredient/forecast",
                get(Self::handle_get_forecast),
            )
            .with_state(resources)
    }

    async fn handle_record(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidJson(request): ValidJson<RecordConsumptionRequest>,
    ) -> Result<Response, AppError> {
        let user_id = request
            .user_id
            .ok_or_else(|| AppError::missing_field("userId"))
            .in_request(&request_id)?;
        let ingredient = request
            .ingredient
            .ok_or_else(|| AppError::missing_field("ingredient"))
            .in_request(&request_id)?;
        let served = request
            .portion_served
            .ok_or_else(|| AppError::missing_field("portionServed"))
            .in_request(&request_id)?;
        let consumed = request
            .portion_consumed
            .ok_or_else(|| AppError::missing_field("portionConsumed"))
            .in_request(&request_id)?;

        let outcome = resources
            .consumption
            .record_consumption(&user_id, &ingredient, served, consumed, request.timestamp)
            .await
            .in_request(&request_id)?;
        Ok((StatusCode::CREATED, Json(outcome)).into_response())
    }

    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(user_id): ValidPath<String>,
    ) -> Result<Response, AppError> {
        let profile = resources
            .consumption
            .profile(&user_id)
            .await
            .in_request(&request_id)?;
        Ok(Json(profile).into_response())
    }

    async fn handle_update_settings(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(user_id): ValidPath<String>,
        ValidJson(update): ValidJson<SettingsUpdate>,
    ) -> Result<Response, AppError> {
        let profile = resources
            .consumption
            .update_settings(&user_id, update)
            .await
            .in_request(&request_id)?;
        Ok(Json(profile).into_response())
    }

    async fn handle_get_suggestion(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath((user_id, ingredient)): ValidPath<(String, String)>,
    ) -> Result<Response, AppError> {
        let suggestion = resources
            .consumption
            .suggestion(&user_id, &ingredient)
            .await
            .in_request(&request_id)?;
        Ok(Json(suggestion).into_response())
    }

    async fn handle_apply_adjustment(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath((user_id, ingredient)): ValidPath<(String, String)>,
        ValidJson(request): ValidJson<ApplyAdjustmentRequest>,
    ) -> Result<Response, AppError> {
        let new_portion = request
            .new_portion
            .ok_or_else(|| AppError::missing_field("newPortion"))
            .in_request(&request_id)?;

        let entry = resources
            .consumption
            .apply_adjustment(&user_id, &ingredient, new_portion, request.user_approved)
            .await
            .in_request(&request_id)?;
        info!(
            request_id = %request_id,
            user_id = %user_id,
            ingredient = %entry.ingredient,
            new_portion = entry.new_portion,
            "Portion adjustment applied"
        );
        Ok(Json(entry).into_response())
    }

    async fn handle_get_forecast(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath((user_id, ingredient)): ValidPath<(String, String)>,
        ValidQuery(query): ValidQuery<ForecastQuery>,
    ) -> Result<Response, AppError> {
        let forecast = resources
            .consumption
            .forecast(
                &user_id,
                &ingredient,
                query.days_ahead.unwrap_or(DEFAULT_FORECAST_DAYS),
            )
            .await
            .in_request(&request_id)?;
        Ok(Json(forecast).into_response())
    }
}
