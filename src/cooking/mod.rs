// ABOUTME: Cooking process controller: session state machine, timing, metrics, automation
// ABOUTME: Re-exports the session types and the service used by the HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Cooking
//!
//! A cooking session executes the ordered instructions of a recipe. The
//! session itself ([`session::CookingSession`]) is a synchronous state
//! machine; [`service::CookingService`] stores sessions in a repository and
//! applies operations while holding the per-session lock.

/// Automation hook for sensor readings of automated sessions
pub mod automation;
/// Quality metrics store
pub mod metrics;
/// Cooking service used by the routes
pub mod service;
/// Session state machine
pub mod session;
/// Step timing records
pub mod timing;

pub use automation::{AutomationContext, AutomationHook, LoggingAutomationHook};
pub use metrics::{KnownMetric, MetricEntry, MetricValue, QualityMetrics};
pub use service::CookingService;
pub use session::{
    CookingSession, EventSeverity, SensorReading, SessionEvent, SessionOptions, SessionProgress,
    SessionSummary, StepAdvance, StepInfo,
};
pub use timing::{StepTiming, StepTracker};
