// ABOUTME: Cooking service orchestrating recipes, session storage, and the automation hook
// ABOUTME: Resolves session handles and applies state machine operations under the session lock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use autofood_core::errors::{AppError, AppResult};
use autofood_core::models::{SensorKind, SessionStatus};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::automation::{AutomationContext, AutomationHook};
use super::metrics::{MetricEntry, MetricValue};
use super::session::{CookingSession, SensorReading, SessionOptions, SessionProgress, StepAdvance};
use crate::recipes::RecipeCatalog;
use crate::storage::{Repository, Shared};

/// Entry point for everything the HTTP layer does with cooking sessions
#[derive(Clone)]
pub struct CookingService {
    sessions: Arc<dyn Repository<Uuid, CookingSession>>,
    recipes: Arc<RecipeCatalog>,
    automation: Arc<dyn AutomationHook>,
}

impl CookingService {
    /// Create a service over the given storage, catalog and hook
    #[must_use]
    pub fn new(
        sessions: Arc<dyn Repository<Uuid, CookingSession>>,
        recipes: Arc<RecipeCatalog>,
        automation: Arc<dyn AutomationHook>,
    ) -> Self {
        Self {
            sessions,
            recipes,
            automation,
        }
    }

    /// Create a session for a recipe and start it immediately
    ///
    /// # Errors
    /// `ResourceNotFound` if the recipe does not exist, a validation error
    /// for zero servings.
    pub async fn start_session(
        &self,
        recipe_id: Uuid,
        options: SessionOptions,
    ) -> AppResult<CookingSession> {
        if options.servings == Some(0) {
            return Err(AppError::out_of_range("servings", "servings must be at least 1"));
        }
        let recipe = self.recipes.get(recipe_id)?;
        let now = Utc::now();
        let mut session = CookingSession::new(&recipe, options, now);
        session.start(now)?;

        let snapshot = session.clone();
        self.sessions.insert(session.id(), session).await;
        Ok(snapshot)
    }

    /// Snapshot of a session
    ///
    /// # Errors
    /// `ResourceNotFound` for unknown or expired sessions.
    pub async fn session(&self, id: Uuid) -> AppResult<CookingSession> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    /// Progress of a session
    ///
    /// # Errors
    /// `ResourceNotFound` for unknown or expired sessions.
    pub async fn progress(&self, id: Uuid) -> AppResult<SessionProgress> {
        let handle = self.handle(id).await?;
        let session = handle.lock().await;
        Ok(session.progress(Utc::now()))
    }

    /// Finish the current step
    ///
    /// # Errors
    /// `ResourceNotFound`, or `InvalidTransition` unless the session is in progress.
    pub async fn advance(&self, id: Uuid) -> AppResult<StepAdvance> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        Ok(session.advance_step(Utc::now())?)
    }

    /// Pause a running session
    ///
    /// # Errors
    /// `ResourceNotFound`, or `InvalidTransition` unless the session is in progress.
    pub async fn pause(&self, id: Uuid) -> AppResult<SessionStatus> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        session.pause(Utc::now())?;
        Ok(session.status())
    }

    /// Resume a paused session
    ///
    /// # Errors
    /// `ResourceNotFound`, or `InvalidTransition` unless the session is paused.
    pub async fn resume(&self, id: Uuid) -> AppResult<SessionStatus> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        session.resume(Utc::now())?;
        Ok(session.status())
    }

    /// Abort a session
    ///
    /// # Errors
    /// `ResourceNotFound`, or `InvalidTransition` if it already ended.
    pub async fn abort(&self, id: Uuid, reason: Option<&str>) -> AppResult<SessionStatus> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        session.abort(reason, Utc::now())?;
        Ok(session.status())
    }

    /// Log a sensor reading and hand it to the automation hook
    ///
    /// The hook runs after the session lock is released; a hook failure is
    /// reported to the caller but the reading stays logged.
    ///
    /// # Errors
    /// `ResourceNotFound`, a validation error for non-finite values, or
    /// `AutomationFailed` when the hook rejects the reading.
    pub async fn record_sensor(
        &self,
        id: Uuid,
        sensor: SensorKind,
        value: f64,
    ) -> AppResult<SensorReading> {
        let handle = self.handle(id).await?;
        let (reading, context) = {
            let mut session = handle.lock().await;
            let reading = session.record_sensor_reading(sensor, value, Utc::now())?;
            let context = session
                .automation_level()
                .is_automated()
                .then(|| AutomationContext {
                    session_id: id,
                    level: session.automation_level(),
                    instruction: session.current_instruction().map(|i| i.step.clone()),
                    reading: reading.clone(),
                });
            (reading, context)
        };

        if let Some(context) = context {
            if let Err(e) = self.automation.on_sensor_reading(&context).await {
                warn!(session_id = %id, error = %e, "Automation hook rejected sensor reading");
                return Err(e.into());
            }
        } else {
            debug!(session_id = %id, sensor = %reading.sensor, "Manual session, automation skipped");
        }
        Ok(reading)
    }

    /// Record a quality metric
    ///
    /// # Errors
    /// `ResourceNotFound` or a validation error for the metric.
    pub async fn record_metric(
        &self,
        id: Uuid,
        name: &str,
        value: MetricValue,
    ) -> AppResult<MetricEntry> {
        let handle = self.handle(id).await?;
        let mut session = handle.lock().await;
        session.record_quality_metric(name, value, Utc::now())
    }

    /// Number of sessions currently stored
    pub async fn session_count(&self) -> usize {
        self.sessions.len().await
    }

    async fn handle(&self, id: Uuid) -> AppResult<Shared<CookingSession>> {
        self.sessions.get(&id).await.ok_or_else(|| {
            AppError::not_found(format!("Cooking session {id}")).with_resource_id(id.to_string())
        })
    }
}
