// ABOUTME: Hardware route handlers for sensor readings and actuator commands
// ABOUTME: Serves the latest polled samples and forwards commands to registered actuators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use autofood_core::errors::AppError;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use tracing::info;

use super::{RequestContext, ValidJson, ValidPath};
use crate::hardware::ActuatorCommand;
use crate::middleware::RequestId;
use crate::resources::ServerResources;

/// Body of `POST /api/hardware/actuators/:name`
#[derive(Debug, Deserialize)]
pub struct ActuatorRequest {
    /// Command verb
    pub command: Option<String>,
    /// Command arguments
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// Hardware routes
pub struct HardwareRoutes;

impl HardwareRoutes {
    /// Create all hardware routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/hardware/sensors", get(Self::handle_get_sensors))
            .route("/api/hardware/actuators", get(Self::handle_list_actuators))
            .route(
                "/api/hardware/actuators/:name",
                post(Self::handle_actuate),
            )
            .with_state(resources)
    }

    async fn handle_get_sensors(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
    ) -> Result<Response, AppError> {
        let mut readings = resources.hardware.latest_readings();
        if readings.is_empty() {
            // Nothing polled yet; read on demand
            resources
                .hardware
                .poll_once()
                .await
                .in_request(&request_id)?;
            readings = resources.hardware.latest_readings();
        }
        Ok(Json(readings).into_response())
    }

    async fn handle_list_actuators(State(resources): State<Arc<ServerResources>>) -> Response {
        Json(resources.hardware.actuator_names()).into_response()
    }

    async fn handle_actuate(
        State(resources): State<Arc<ServerResources>>,
        Extension(request_id): Extension<RequestId>,
        ValidPath(name): ValidPath<String>,
        ValidJson(request): ValidJson<ActuatorRequest>,
    ) -> Result<Response, AppError> {
        let command = ActuatorCommand {
            actuator: name.clone(),
            command: request
                .command
                .filter(|c| !c.trim().is_empty())
                .ok_or_else(|| AppError::missing_field("command"))
                .in_request(&request_id)?,
            parameters: request.parameters,
        };

        resources
            .hardware
            .actuate(&name, &command)
            .await
            .in_request(&request_id)?;
        info!(request_id = %request_id, actuator = %name, command = %command.command, "Actuator command applied");
        Ok(Json(serde_json::json!({
            "actuator": name,
            "command": command.command,
            "status": "applied"
        }))
        .into_response())
    }
}
