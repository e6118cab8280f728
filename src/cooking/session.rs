// ABOUTME: Cooking session state machine with step timing and sensor logging
// ABOUTME: Enforces legal lifecycle transitions and exposes progress and summary queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Cooking Session
//!
//! ```text
//! Initialized ──start──▶ InProgress ──advance (last step)──▶ Completed
//!      │                  │      ▲
//!      │                pause  resume
//!      │                  ▼      │
//!      │                  Paused ─┘
//!      └───────── abort (from any non-terminal state) ──▶ Aborted
//! ```
//!
//! Every method takes the current time explicitly so timings are
//! deterministic under test. A rejected transition never changes the session.

use autofood_core::errors::{AppError, AppResult, CookingProcessError};
use autofood_core::models::{AutomationLevel, Instruction, Recipe, SensorKind, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::metrics::{MetricEntry, MetricValue, QualityMetrics};
use super::timing::{millis_between, StepTiming, StepTracker};

/// A step is reported as running long once it exceeds its expectation by this factor
const OVERRUN_WARNING_RATIO: f64 = 1.5;

/// Caller-supplied settings for a new session
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Servings to cook; defaults to the recipe's servings
    pub servings: Option<u32>,
    /// Free-form changes to the recipe
    pub modifications: Vec<String>,
    /// How much is delegated to hardware
    pub automation_level: AutomationLevel,
    /// Notes from the cook
    pub notes: Option<String>,
}

/// One sensor reading in a session log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    /// Sensor that produced the value
    pub sensor: SensorKind,
    /// Measured value
    pub value: f64,
    /// When it was taken
    pub recorded_at: DateTime<Utc>,
    /// Session step index at the time
    pub step_index: usize,
}

/// Severity of a session log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    /// Something unusual that did not stop the session
    Warning,
    /// Something that ended or broke the session
    Error,
}

/// Entry of the session's warning/error log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEvent {
    /// How serious it is
    pub severity: EventSeverity,
    /// What happened
    pub message: String,
    /// Step index at the time
    pub step_index: usize,
    /// When it happened
    pub at: DateTime<Utc>,
}

/// Returned by `advance_step` while steps remain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInfo {
    /// Index of the step now running
    pub step_index: usize,
    /// Number of steps in the recipe
    pub total_steps: usize,
    /// The instruction to carry out
    pub instruction: Instruction,
    /// Expected duration of the new step
    pub expected_duration_ms: Option<u64>,
    /// Timing of the step that just finished
    pub previous_step: Option<StepTiming>,
}

/// Final report of a finished session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session identifier
    pub session_id: Uuid,
    /// Recipe that was cooked
    pub recipe_id: Uuid,
    /// Final status
    pub status: SessionStatus,
    /// Number of steps in the recipe
    pub total_steps: usize,
    /// Timing of each finished step
    pub step_timings: Vec<StepTiming>,
    /// Quality metrics at the end of the session
    pub quality_metrics: QualityMetrics,
    /// When cooking started
    pub started_at: Option<DateTime<Utc>>,
    /// When the session reached its terminal state
    pub finished_at: Option<DateTime<Utc>>,
    /// Wall-clock time from start to finish
    pub total_duration_ms: u64,
    /// Unpaused time summed over finished steps
    pub active_duration_ms: u64,
    /// Part of the total spent paused
    pub paused_duration_ms: u64,
    /// Number of sensor readings logged
    pub sensor_readings: usize,
    /// Number of warnings logged
    pub warnings: usize,
}

/// Result of a successful `advance_step`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepAdvance {
    /// Moved on to the next step
    Step(StepInfo),
    /// That was the last step
    Completed(SessionSummary),
}

/// Point-in-time progress of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    /// Session identifier
    pub session_id: Uuid,
    /// Current status
    pub status: SessionStatus,
    /// Current step index
    pub current_step: usize,
    /// Number of steps in the recipe
    pub total_steps: usize,
    /// Finished steps as a percentage of all steps
    pub completion_pct: f64,
    /// Instruction of the current step, absent once all steps are done
    pub current_instruction: Option<Instruction>,
    /// Time since the session started
    pub elapsed_ms: u64,
    /// Time spent on the current step
    pub current_step_elapsed_ms: u64,
    /// Expected time left according to the recipe timings
    pub expected_remaining_ms: u64,
}

/// A recipe being cooked
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingSession {
    id: Uuid,
    recipe_id: Uuid,
    recipe_name: String,
    instructions: Vec<Instruction>,
    status: SessionStatus,
    current_step: usize,
    servings: u32,
    modifications: Vec<String>,
    automation_level: AutomationLevel,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    paused_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    paused_duration_ms: u64,
    timings: StepTracker,
    sensor_log: Vec<SensorReading>,
    quality_metrics: QualityMetrics,
    events: Vec<SessionEvent>,
}

impl CookingSession {
    /// Create a session for `recipe`, snapshotting its instructions
    #[must_use]
    pub fn new(recipe: &Recipe, options: SessionOptions, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipe_id: recipe.id,
            recipe_name: recipe.name.clone(),
            instructions: recipe.instructions.clone(),
            status: SessionStatus::Initialized,
            current_step: 0,
            servings: options.servings.unwrap_or(recipe.servings),
            modifications: options.modifications,
            automation_level: options.automation_level,
            notes: options.notes,
            created_at: now,
            started_at: None,
            paused_at: None,
            finished_at: None,
            paused_duration_ms: 0,
            timings: StepTracker::new(),
            sensor_log: Vec::new(),
            quality_metrics: QualityMetrics::new(),
            events: Vec::new(),
        }
    }

    /// Session identifier
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Recipe being cooked
    #[must_use]
    pub const fn recipe_id(&self) -> Uuid {
        self.recipe_id
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Index of the current step; equals `total_steps` once completed
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current_step
    }

    /// Number of instructions in the snapshot
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.instructions.len()
    }

    /// Automation level chosen at creation
    #[must_use]
    pub const fn automation_level(&self) -> AutomationLevel {
        self.automation_level
    }

    /// Servings being cooked
    #[must_use]
    pub const fn servings(&self) -> u32 {
        self.servings
    }

    /// Instruction of the current step
    #[must_use]
    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.instructions.get(self.current_step)
    }

    /// Timing records of finished steps
    #[must_use]
    pub fn step_timings(&self) -> &[StepTiming] {
        self.timings.records()
    }

    /// Sensor log in arrival order
    #[must_use]
    pub fn sensor_log(&self) -> &[SensorReading] {
        &self.sensor_log
    }

    /// Quality metrics recorded so far
    #[must_use]
    pub const fn quality_metrics(&self) -> &QualityMetrics {
        &self.quality_metrics
    }

    /// Warning and error log
    #[must_use]
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Begin cooking
    ///
    /// # Errors
    /// `InvalidTransition` unless the session is `Initialized`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), CookingProcessError> {
        self.require(SessionStatus::Initialized, "start")?;

        self.status = SessionStatus::InProgress;
        self.started_at = Some(now);
        let expected = self.instructions.first().and_then(Instruction::expected_duration);
        self.timings.open(0, now, expected);

        info!(session_id = %self.id, recipe_id = %self.recipe_id, steps = self.total_steps(), "Cooking session started");
        Ok(())
    }

    /// Halt cooking temporarily
    ///
    /// # Errors
    /// `InvalidTransition` unless the session is `InProgress`.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), CookingProcessError> {
        self.require(SessionStatus::InProgress, "pause")?;

        self.status = SessionStatus::Paused;
        self.paused_at = Some(now);
        info!(session_id = %self.id, step = self.current_step, "Cooking session paused");
        Ok(())
    }

    /// Continue after a pause
    ///
    /// # Errors
    /// `InvalidTransition` unless the session is `Paused`.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), CookingProcessError> {
        self.require(SessionStatus::Paused, "resume")?;

        self.close_pause(now);
        self.status = SessionStatus::InProgress;
        info!(session_id = %self.id, step = self.current_step, "Cooking session resumed");
        Ok(())
    }

    /// Finish the current step and move to the next one
    ///
    /// Advancing past the last step completes the session and returns its
    /// summary instead of step information.
    ///
    /// # Errors
    /// `InvalidTransition` unless the session is `InProgress`.
    pub fn advance_step(&mut self, now: DateTime<Utc>) -> Result<StepAdvance, CookingProcessError> {
        self.require(SessionStatus::InProgress, "advance")?;

        let previous_step = self.timings.close(now).cloned();
        if let Some(timing) = &previous_step {
            if timing.overrun_ratio().is_some_and(|ratio| ratio > OVERRUN_WARNING_RATIO) {
                self.log_event(
                    EventSeverity::Warning,
                    format!(
                        "step {} took {}ms, expected {}ms",
                        timing.step_index,
                        timing.active_duration_ms(),
                        timing.expected_duration_ms.unwrap_or_default()
                    ),
                    now,
                );
            }
        }

        self.current_step = (self.current_step + 1).min(self.total_steps());

        if self.current_step >= self.total_steps() {
            self.status = SessionStatus::Completed;
            self.finished_at = Some(now);
            info!(
                session_id = %self.id,
                steps = self.timings.records().len(),
                "Cooking session completed"
            );
            return Ok(StepAdvance::Completed(self.summary(now)));
        }

        let instruction = self.instructions[self.current_step].clone();
        let expected = instruction.expected_duration();
        self.timings.open(self.current_step, now, expected);

        Ok(StepAdvance::Step(StepInfo {
            step_index: self.current_step,
            total_steps: self.total_steps(),
            expected_duration_ms: self
                .timings
                .current()
                .and_then(|open| open.expected_duration_ms),
            instruction,
            previous_step,
        }))
    }

    /// Stop the session for good
    ///
    /// # Errors
    /// `InvalidTransition` if the session already completed or aborted.
    pub fn abort(
        &mut self,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), CookingProcessError> {
        if self.status.is_terminal() {
            return Err(CookingProcessError::invalid_transition("abort", self.status));
        }

        if self.status == SessionStatus::Paused {
            self.close_pause(now);
        }
        self.timings.discard_current();

        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or("no reason given");
        self.log_event(EventSeverity::Error, format!("session aborted: {reason}"), now);

        self.status = SessionStatus::Aborted;
        self.finished_at = Some(now);
        warn!(session_id = %self.id, step = self.current_step, reason, "Cooking session aborted");
        Ok(())
    }

    /// Append a sensor reading tagged with the current step
    ///
    /// Allowed in every state: readings may still arrive while paused or
    /// after the session ended.
    ///
    /// # Errors
    /// Returns a validation error for non-finite values.
    pub fn record_sensor_reading(
        &mut self,
        sensor: SensorKind,
        value: f64,
        now: DateTime<Utc>,
    ) -> AppResult<SensorReading> {
        if !value.is_finite() {
            return Err(AppError::invalid_input("sensor value must be finite"));
        }
        let reading = SensorReading {
            sensor,
            value,
            recorded_at: now,
            step_index: self.current_step,
        };
        self.sensor_log.push(reading.clone());
        Ok(reading)
    }

    /// Store a quality metric, replacing any earlier value
    ///
    /// # Errors
    /// Returns a validation error for blank names or out-of-range values.
    pub fn record_quality_metric(
        &mut self,
        name: &str,
        value: MetricValue,
        now: DateTime<Utc>,
    ) -> AppResult<MetricEntry> {
        self.quality_metrics
            .record(name, value, self.current_step, now)
    }

    /// Progress snapshot at `now`
    #[must_use]
    pub fn progress(&self, now: DateTime<Utc>) -> SessionProgress {
        let total = self.total_steps();
        let completion_pct = if total == 0 {
            100.0
        } else {
            self.current_step as f64 / total as f64 * 100.0
        };

        let reference = self.reference_time(now);
        let current_step_elapsed_ms = self
            .timings
            .current()
            .map_or(0, |open| open.elapsed_ms(reference));

        let current_remaining = self
            .timings
            .current()
            .and_then(|open| open.expected_duration_ms)
            .map_or(0, |expected| expected.saturating_sub(current_step_elapsed_ms));
        let later_steps: u64 = self
            .instructions
            .iter()
            .skip(self.current_step + 1)
            .filter_map(Instruction::expected_duration)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .fold(0, u64::saturating_add);
        let expected_remaining_ms = if self.status.is_terminal() {
            0
        } else {
            current_remaining.saturating_add(later_steps)
        };

        SessionProgress {
            session_id: self.id,
            status: self.status,
            current_step: self.current_step,
            total_steps: total,
            completion_pct,
            current_instruction: self.current_instruction().cloned(),
            elapsed_ms: self.elapsed_ms(now),
            current_step_elapsed_ms,
            expected_remaining_ms,
        }
    }

    /// Timing and quality report
    #[must_use]
    pub fn summary(&self, now: DateTime<Utc>) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            recipe_id: self.recipe_id,
            status: self.status,
            total_steps: self.total_steps(),
            step_timings: self.timings.records().to_vec(),
            quality_metrics: self.quality_metrics.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
            total_duration_ms: self.elapsed_ms(now),
            active_duration_ms: self.timings.total_active_ms(),
            paused_duration_ms: self.paused_duration_ms,
            sensor_readings: self.sensor_log.len(),
            warnings: self
                .events
                .iter()
                .filter(|e| e.severity == EventSeverity::Warning)
                .count(),
        }
    }

    fn require(
        &self,
        expected: SessionStatus,
        operation: &'static str,
    ) -> Result<(), CookingProcessError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(CookingProcessError::invalid_transition(operation, self.status))
        }
    }

    fn close_pause(&mut self, now: DateTime<Utc>) {
        if let Some(paused_at) = self.paused_at.take() {
            let paused_ms = millis_between(paused_at, now);
            self.paused_duration_ms = self.paused_duration_ms.saturating_add(paused_ms);
            self.timings.add_pause(paused_ms);
        }
    }

    fn reference_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.finished_at.unwrap_or(now)
    }

    fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        self.started_at
            .map_or(0, |started| millis_between(started, self.reference_time(now)))
    }

    fn log_event(&mut self, severity: EventSeverity, message: String, now: DateTime<Utc>) {
        self.events.push(SessionEvent {
            severity,
            message,
            step_index: self.current_step,
            at: now,
        });
    }
}
