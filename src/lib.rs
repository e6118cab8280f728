// ABOUTME: Main library entry point for the Autofood kitchen service
// ABOUTME: Provides recipes, cooking session control, and consumption tracking over REST
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Autofood Server
//!
//! An in-memory service that guides cooks through recipes and learns from
//! what people leave on their plates.
//!
//! ## Features
//!
//! - **Cooking sessions**: a strict state machine over recipe steps with step
//!   timing, sensor logs and quality metrics
//! - **Waste tracking**: rolling per-ingredient waste history, portion
//!   suggestions that never apply without approval, and demand forecasts
//! - **Hardware ports**: sensor sources and actuator sinks behind traits, with
//!   a simulated kitchen for development
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use autofood_server::config::ServerConfig;
//! use autofood_server::resources::ServerResources;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::new(config));
//!     resources.recipes.seed_demo_recipes()?;
//!     autofood_server::server::run(resources).await
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Consumption profiles, waste tracking, portion suggestions and forecasts
pub mod consumption;

/// Cooking session state machine and service
pub mod cooking;

/// Unified error types
pub mod errors;

/// Sensor and actuator ports with a simulated kitchen
pub mod hardware;

/// Background task lifecycle management
pub mod lifecycle;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Per-client rate limiting
pub mod rate_limiting;

/// Recipe catalog
pub mod recipes;

/// Shared server resources
pub mod resources;

/// REST route handlers
pub mod routes;

/// HTTP server assembly
pub mod server;

/// Bounded in-memory repositories
pub mod storage;
