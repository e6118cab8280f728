// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Provides liveness and readiness endpoints for load balancers and probes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use std::sync::Arc;

use autofood_core::constants::service_names;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/ready", get(Self::ready_handler))
            .with_state(resources)
    }

    async fn health_handler(
        State(resources): State<Arc<ServerResources>>,
    ) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "service": service_names::AUTOFOOD_SERVER,
            "version": env!("CARGO_PKG_VERSION"),
            "uptimeSeconds": resources.uptime_secs(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn ready_handler(
        State(resources): State<Arc<ServerResources>>,
    ) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "ready",
            "recipes": resources.recipes.len(),
            "activeSessions": resources.cooking.session_count().await,
            "profiles": resources.consumption.profile_count().await,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }
}
