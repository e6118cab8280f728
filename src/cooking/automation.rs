// ABOUTME: Automation hook invoked for sensor readings of automated cooking sessions
// ABOUTME: Pluggable callback trait with a logging-only default implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Automation hook
//!
//! Sessions whose automation level is anything but `manual` forward every
//! sensor reading to an [`AutomationHook`]. No control loop exists yet: the
//! default [`LoggingAutomationHook`] only logs. A hook that drives actuators
//! would implement the same trait and be injected into the cooking service.

use async_trait::async_trait;
use autofood_core::errors::CookingProcessError;
use autofood_core::models::AutomationLevel;
use tracing::info;
use uuid::Uuid;

use super::session::SensorReading;

/// What the hook gets to see about a reading
#[derive(Debug, Clone)]
pub struct AutomationContext {
    /// Session the reading belongs to
    pub session_id: Uuid,
    /// Automation level of the session
    pub level: AutomationLevel,
    /// Instruction text of the current step, if the session has one
    pub instruction: Option<String>,
    /// The reading itself
    pub reading: SensorReading,
}

/// Callback for sensor readings of automated sessions
#[async_trait]
pub trait AutomationHook: Send + Sync {
    /// React to a sensor reading
    ///
    /// # Errors
    /// Returns `CookingProcessError::Automation` when the hook cannot act on
    /// the reading; the reading itself stays recorded.
    async fn on_sensor_reading(&self, context: &AutomationContext)
        -> Result<(), CookingProcessError>;
}

/// Hook that only logs what an automated kitchen would react to
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAutomationHook;

#[async_trait]
impl AutomationHook for LoggingAutomationHook {
    async fn on_sensor_reading(
        &self,
        context: &AutomationContext,
    ) -> Result<(), CookingProcessError> {
        info!(
            session_id = %context.session_id,
            level = ?context.level,
            sensor = %context.reading.sensor,
            value = context.reading.value,
            step_index = context.reading.step_index,
            instruction = context.instruction.as_deref().unwrap_or("-"),
            "Automation hook received sensor reading"
        );
        Ok(())
    }
}
