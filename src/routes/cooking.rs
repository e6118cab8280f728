// ABOUTME: Cooking session route handlers
// ABOUTME: Starts sessions and drives their state machine, sensor log, and quality metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Cooking session routes
//!
//! Every session route addresses a session by UUID. State machine violations
//! surface as `409 INVALID_TRANSITION`; unknown ids as `404`.

use std::sync::Arc;

use autofood_core::errors::AppError;
use autofood_core::models::{AutomationLevel, SensorKind, SessionStatus};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{RequestContext, ValidJson, ValidPath};
use crate::cooking::{MetricValue, SessionOptions};
use crate::middleware::RequestId;
use crate::resources::ServerResources;

/// Body of `POST /api/cooking/sessions`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    /// Recipe to cook
    pub recipe_id: Option<Uuid>,
    /// Servings override
    #[serde(default)]
    pub servings: Option<u32>,
    /// Free-form recipe changes
    #[serde(default)]
    pub modifications: Vec<String>,
    /// `manual`, `assisted`, `semi_automated` or `fully_automated`
    #[serde(default)]
    pub automation_level: Option<String>,
    /// Notes from the cook
    #[serde(default)]
    pub notes: Option<String>,
}

/// Response of `POST /api/cooking/sessions`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    /// New session id
    pub session_id: Uuid,
    /// Status right after creation
    pub status: SessionStatus,
    /// Step index right after creation
    pub current_step: usize,
    /// Instructions in the session
    pub total_steps: usize,
}

/// Body of `POST /api/cooking/sessions/:id/abort`
#[derive(Debug, Default, Deserialize)]
pub struct AbortRequest {
    /// Why the session was stopped
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `POST /api/cooking/sessions/:id/sensors`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadingRequest {
    /// Sensor kind, e.g. `temperature`
    pub sensor_type: Option<String>,
    /// Measured value
    pub value: Option<f64>,
}

/// Body of `POST /api/cooking/sessions/:id/metrics`
#[derive(Debug, Deserialize)]
pub struct QualityMetricRequest {
    /// Metric name
    pub name: Option<String>,
    /// Number, boolean or text
    pub value: Option<MetricValue>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    session_id: Uuid,
    status: SessionStatus,
}

/// Cooking session routes
pub struct CookingRoutes;

impl CookingRoutes {
    /// Create all cooking session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/cooking/sessions", post(Self::handle_start_session))
            .route("/api/cooking/sessions/:id", get(Self::handle_get_session))
            .route(
                "/api/cooking/sessions/:id/progress",
                get(Self::handle_get_progress),
            )
            .route(
                "/api/cooking/sessions/:id/advance",
                post(Self::handle_advance),
            )
            .route("/api/cooking/sessions/:id/pause", post(Self::handle_pause))
            .route(
                "/api/cooking/sessions/:id/resume",
                post(Self::handle_resume),
            )
            .route("/api/cooking/sessions/:id/abort", post(Self::handle_abort))
            .route(
                "/api/cooking/sessions/:id/sensors",
                post(Self::handle_record_sensor),
            )
            .route(
                "/api/cooking/sessions/:id/metrics",
                post(Self::handle_record_metric),
            )
            .with_state(resources)
    }

    async fn handle_start_session(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidJson(request): ValidJson<StartSessionRequest>,
    ) -> Result<Response, AppError> {
        let recipe_id = request
            .recipe_id
            .ok_or_else(|| AppError::missing_field("recipeId"))
            .in_request(&request_id)?;
        let automation_level = request
            .automation_level
            .as_deref()
            .map(str::parse::<AutomationLevel>)
            .transpose()
            .in_request(&request_id)?
            .unwrap_or_default();

        let options = SessionOptions {
            servings: request.servings,
            modifications: request.modifications,
            automation_level,
            notes: request.notes,
        };
        let session = resources
            .cooking
            .start_session(recipe_id, options)
            .await
            .in_request(&request_id)?;

        info!(
            request_id = %request_id,
            session_id = %session.id(),
            recipe_id = %recipe_id,
            "Cooking session created"
        );
        let response = StartSessionResponse {
            session_id: session.id(),
            status: session.status(),
            current_step: session.current_step(),
            total_steps: session.total_steps(),
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    async fn handle_get_session(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(id): ValidPath<Uuid>,
    ) -> Result<Response, AppError> {
        let session = resources.cooking.session(id).await.in_request(&request_id)?;
        Ok(Json(session).into_response())
    }

    async fn handle_get_progress(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(id): ValidPath<Uuid>,
    ) -> Result<Response, AppError> {
        let progress = resources.cooking.progress(id).await.in_request(&request_id)?;
        Ok(Json(progress).into_response())
    }

    async fn handle_advance(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(id): ValidPath<Uuid>,
    ) -> Result<Response, AppError> {
        let outcome = resources.cooking.advance(id).await.in_request(&request_id)?;
        Ok(Json(outcome).into_response())
    }

    async fn handle_pause(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(id): ValidPath<Uuid>,
    ) -> Result<Response, AppError> {
        let status = resources.cooking.pause(id).await.in_request(&request_id)?;
        Ok(Json(StatusResponse {
            session_id: id,
            status,
        })
        .into_response())
    }

    async fn handle_resume(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(id): ValidPath<Uuid>,
    ) -> Result<Response, AppError> {
        let status = resources.cooking.resume(id).await.in_request(&request_id)?;
        Ok(Json(StatusResponse {
            session_id: id,
            status,
        })
        .into_response())
    }

    async fn handle_abort(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(id): ValidPath<Uuid>,
        body: Option<Json<AbortRequest>>,
    ) -> Result<Response, AppError> {
        let request = body.map(|Json(request)| request).unwrap_or_default();
        let status = resources
            .cooking
            .abort(id, request.reason.as_deref())
            .await
            .in_request(&request_id)?;
        Ok(Json(StatusResponse {
            session_id: id,
            status,
        })
        .into_response())
    }

    async fn handle_record_sensor(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(id): ValidPath<Uuid>,
        ValidJson(request): ValidJson<SensorReadingRequest>,
    ) -> Result<Response, AppError> {
        let sensor = request
            .sensor_type
            .ok_or_else(|| AppError::missing_field("sensorType"))
            .and_then(|name| name.parse::<SensorKind>())
            .in_request(&request_id)?;
        let value = request
            .value
            .ok_or_else(|| AppError::missing_field("value"))
            .in_request(&request_id)?;

        let reading = resources
            .cooking
            .record_sensor(id, sensor, value)
            .await
            .in_request(&request_id)?;
        Ok((StatusCode::CREATED, Json(reading)).into_response())
    }

    async fn handle_record_metric(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(id): ValidPath<Uuid>,
        ValidJson(request): ValidJson<QualityMetricRequest>,
    ) -> Result<Response, AppError> {
        let name = request
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("name"))
            .in_request(&request_id)?;
        let value = request
            .value
            .ok_or_else(|| AppError::missing_field("value"))
            .in_request(&request_id)?;

        let metric = resources
            .cooking
            .record_metric(id, &name, value)
            .await
            .in_request(&request_id)?;
        Ok((StatusCode::CREATED, Json(metric)).into_response())
    }
}
