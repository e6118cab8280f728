// ABOUTME: HTTP server assembly and lifecycle for the Autofood REST API
// ABOUTME: Builds the axum router with middleware layers and runs it with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # HTTP Server
//!
//! Layer order, outermost first: trace span, request id, CORS, rate limit,
//! timeout. The request id middleware runs inside the trace span so it can
//! record the id on it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use autofood_core::constants::network::REQUEST_TIMEOUT_SECS;
use autofood_core::errors::AppError;
use axum::extract::Request;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::lifecycle::TaskScheduler;
use crate::middleware::{
    create_request_span, rate_limit_middleware, request_id_middleware, setup_cors, RequestId,
};
use crate::resources::ServerResources;
use crate::routes::{
    ConsumptionRoutes, CookingRoutes, HardwareRoutes, HealthRoutes, RecipeRoutes,
};

/// Build the complete application router
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(RecipeRoutes::routes(Arc::clone(resources)))
        .merge(CookingRoutes::routes(Arc::clone(resources)))
        .merge(ConsumptionRoutes::routes(Arc::clone(resources)))
        .merge(HardwareRoutes::routes(Arc::clone(resources)))
        .fallback(route_not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(middleware::from_fn_with_state(
            Arc::clone(resources),
            rate_limit_middleware,
        ))
        .layer(setup_cors(&resources.config))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(create_request_span))
}

async fn route_not_found(request: Request) -> AppError {
    let error = AppError::not_found(format!("Route {} {}", request.method(), request.uri().path()));
    match request.extensions().get::<RequestId>() {
        Some(request_id) => error.with_request_id(request_id.as_str()),
        None => error,
    }
}

/// Bind, serve until a shutdown signal arrives, then stop background tasks
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let address = resources.config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    let mut scheduler = TaskScheduler::new();
    for task in resources.background_tasks() {
        scheduler.register(task);
    }
    scheduler.start_all();

    info!(
        address = %address,
        background_tasks = scheduler.running(),
        "Autofood server listening"
    );

    let app = build_router(&resources);
    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    info!("HTTP server stopped, shutting down background tasks");
    scheduler.shutdown_all().await;
    served.context("HTTP server failed")
}

/// Build resources from `config` and run the server
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the server fails.
pub async fn run_with_config(config: ServerConfig) -> Result<()> {
    config.validate()?;
    let resources = Arc::new(ServerResources::new(config));
    run(resources).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => info!("Received terminate signal, initiating graceful shutdown"),
    }
}
