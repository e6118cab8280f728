// ABOUTME: Per-step timing records for cooking sessions
// ABOUTME: Tracks when each instruction step started and how long it actually took
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing of one finished instruction step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTiming {
    /// Index of the instruction this timing belongs to
    pub step_index: usize,
    /// When the step started
    pub started_at: DateTime<Utc>,
    /// When the step finished
    pub finished_at: DateTime<Utc>,
    /// Duration the recipe expected, if it specified one
    pub expected_duration_ms: Option<u64>,
    /// Measured duration, pauses included
    pub actual_duration_ms: u64,
    /// Part of `actual_duration_ms` the session spent paused
    #[serde(default)]
    pub paused_duration_ms: u64,
}

impl StepTiming {
    /// Time the step was actively cooking
    #[must_use]
    pub const fn active_duration_ms(&self) -> u64 {
        self.actual_duration_ms.saturating_sub(self.paused_duration_ms)
    }

    /// Ratio of active to expected duration, if an expectation exists
    #[must_use]
    pub fn overrun_ratio(&self) -> Option<f64> {
        self.expected_duration_ms
            .filter(|expected| *expected > 0)
            .map(|expected| self.active_duration_ms() as f64 / expected as f64)
    }
}

/// Step currently being timed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenStep {
    /// Index of the running instruction
    pub step_index: usize,
    /// When it started
    pub started_at: DateTime<Utc>,
    /// Duration the recipe expected, if it specified one
    pub expected_duration_ms: Option<u64>,
    /// Paused time accumulated while this step was running
    #[serde(default)]
    pub paused_duration_ms: u64,
}

impl OpenStep {
    /// Time spent on this step so far
    #[must_use]
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        millis_between(self.started_at, now)
    }
}

/// Records start and actual duration of each instruction step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTracker {
    completed: Vec<StepTiming>,
    current: Option<OpenStep>,
}

impl StepTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing `step_index` at `started_at`
    pub fn open(&mut self, step_index: usize, started_at: DateTime<Utc>, expected: Option<Duration>) {
        self.current = Some(OpenStep {
            step_index,
            started_at,
            expected_duration_ms: expected.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            paused_duration_ms: 0,
        });
    }

    /// Charge a finished pause to the running step
    pub fn add_pause(&mut self, paused_ms: u64) {
        if let Some(open) = self.current.as_mut() {
            open.paused_duration_ms = open.paused_duration_ms.saturating_add(paused_ms);
        }
    }

    /// Finish the running step at `now` and return its record
    pub fn close(&mut self, now: DateTime<Utc>) -> Option<&StepTiming> {
        let open = self.current.take()?;
        self.completed.push(StepTiming {
            step_index: open.step_index,
            started_at: open.started_at,
            finished_at: now,
            expected_duration_ms: open.expected_duration_ms,
            actual_duration_ms: millis_between(open.started_at, now),
            paused_duration_ms: open.paused_duration_ms,
        });
        self.completed.last()
    }

    /// Drop the running step without recording it
    pub fn discard_current(&mut self) -> Option<OpenStep> {
        self.current.take()
    }

    /// Finished step records in order
    #[must_use]
    pub fn records(&self) -> &[StepTiming] {
        &self.completed
    }

    /// The step being timed, if any
    #[must_use]
    pub const fn current(&self) -> Option<&OpenStep> {
        self.current.as_ref()
    }

    /// Active cooking time summed over finished steps
    #[must_use]
    pub fn total_active_ms(&self) -> u64 {
        self.completed
            .iter()
            .fold(0, |total, t| total.saturating_add(t.active_duration_ms()))
    }
}

/// Milliseconds from `start` to `end`, zero if the clock went backwards
#[must_use]
pub fn millis_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    u64::try_from((end - start).num_milliseconds()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_close_records_actual_duration() {
        let start = Utc::now();
        let mut tracker = StepTracker::new();
        tracker.open(0, start, Some(Duration::from_secs(300)));

        let timing = tracker.close(start + TimeDelta::seconds(90)).cloned().unwrap();
        assert_eq!(timing.step_index, 0);
        assert_eq!(timing.actual_duration_ms, 90_000);
        assert_eq!(timing.expected_duration_ms, Some(300_000));
        assert!(tracker.current().is_none());
    }

    #[test]
    fn test_pauses_do_not_count_as_active_time() {
        let start = Utc::now();
        let mut tracker = StepTracker::new();
        tracker.open(0, start, Some(Duration::from_secs(60)));
        tracker.add_pause(120_000);

        let timing = tracker.close(start + TimeDelta::seconds(170)).cloned().unwrap();
        assert_eq!(timing.actual_duration_ms, 170_000);
        assert_eq!(timing.paused_duration_ms, 120_000);
        assert_eq!(timing.active_duration_ms(), 50_000);
        assert!(timing.overrun_ratio().unwrap() < 1.0);
        assert_eq!(tracker.total_active_ms(), 50_000);
    }

    #[test]
    fn test_close_without_open_step_is_noop() {
        let mut tracker = StepTracker::new();
        assert!(tracker.close(Utc::now()).is_none());
        assert!(tracker.records().is_empty());
    }

    #[test]
    fn test_clock_skew_clamps_to_zero() {
        let now = Utc::now();
        assert_eq!(millis_between(now, now - TimeDelta::seconds(5)), 0);
    }
}
