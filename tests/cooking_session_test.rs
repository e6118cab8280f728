// ABOUTME: Integration tests for the cooking session state machine and service
// ABOUTME: Covers step counting, illegal transitions, terminal states, and the automation hook
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use autofood_core::errors::{CookingProcessError, ErrorCode};
use autofood_core::models::{AutomationLevel, Instruction, Recipe, SensorKind, SessionStatus};
use autofood_server::cooking::{
    AutomationContext, AutomationHook, CookingSession, MetricValue, SessionOptions, StepAdvance,
};
use autofood_server::resources::ServerResources;
use chrono::{TimeDelta, Utc};
use common::{create_recipe, create_test_resources, test_config};
use uuid::Uuid;

fn recipe(steps: usize) -> Recipe {
    Recipe::new(
        "Pancakes",
        2,
        (1..=steps)
            .map(|n| Instruction::timed(format!("step {n}"), 2.0))
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_step_index_tracks_advances_and_completes_once() {
    let now = Utc::now();
    let mut session = CookingSession::new(&recipe(3), SessionOptions::default(), now);
    session.start(now).unwrap();

    for expected in 1..3 {
        let outcome = session.advance_step(now).unwrap();
        assert!(matches!(outcome, StepAdvance::Step(ref info) if info.step_index == expected));
        assert_eq!(session.current_step(), expected);
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    let outcome = session.advance_step(now).unwrap();
    let StepAdvance::Completed(summary) = outcome else {
        panic!("third advance should complete a three-step recipe");
    };
    assert_eq!(summary.status, SessionStatus::Completed);
    assert_eq!(summary.step_timings.len(), 3);
    assert_eq!(session.current_step(), 3);

    // A further advance fails and does not recount
    let err = session.advance_step(now).unwrap_err();
    assert_eq!(
        err,
        CookingProcessError::invalid_transition("advance", SessionStatus::Completed)
    );
    assert_eq!(session.current_step(), 3);
    assert_eq!(session.step_timings().len(), 3);
}

#[test]
fn test_oversized_step_timing_cannot_break_a_session() {
    let err = Recipe::new("Slow Cure", 1, vec![Instruction::timed("wait", 1e300)]).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    // A recipe that skipped validation still starts and reports progress
    let now = Utc::now();
    let unchecked = Recipe {
        id: Uuid::new_v4(),
        name: "Slow Cure".to_owned(),
        servings: 1,
        instructions: vec![
            Instruction::timed("wait", 1e300),
            Instruction::timed("serve", 1.0),
        ],
        created_at: now,
    };
    let mut session = CookingSession::new(&unchecked, SessionOptions::default(), now);
    session.start(now).unwrap();
    assert_eq!(session.progress(now).expected_remaining_ms, 60_000);
    assert!(session.advance_step(now + TimeDelta::seconds(5)).is_ok());
}

#[test]
fn test_pause_from_initialized_is_rejected_without_change() {
    let now = Utc::now();
    let mut session = CookingSession::new(&recipe(2), SessionOptions::default(), now);

    let err = session.pause(now).unwrap_err();
    assert!(matches!(
        err,
        CookingProcessError::InvalidTransition {
            operation: "pause",
            state: SessionStatus::Initialized
        }
    ));
    assert_eq!(session.status(), SessionStatus::Initialized);
    assert!(session.resume(now).is_err());
    assert!(session.advance_step(now).is_err());
}

#[test]
fn test_paused_session_cannot_advance() {
    let now = Utc::now();
    let mut session = CookingSession::new(&recipe(2), SessionOptions::default(), now);
    session.start(now).unwrap();
    session.pause(now).unwrap();

    assert!(session.advance_step(now).is_err());
    assert!(session.pause(now).is_err());
    assert_eq!(session.current_step(), 0);

    session.resume(now).unwrap();
    assert!(session.advance_step(now).is_ok());
}

#[test]
fn test_terminal_states_reject_every_transition() {
    let now = Utc::now();

    let mut aborted = CookingSession::new(&recipe(2), SessionOptions::default(), now);
    aborted.start(now).unwrap();
    aborted.abort(Some("burnt"), now).unwrap();

    let mut completed = CookingSession::new(&recipe(1), SessionOptions::default(), now);
    completed.start(now).unwrap();
    completed.advance_step(now).unwrap();
    assert_eq!(completed.status(), SessionStatus::Completed);

    for session in [&mut aborted, &mut completed] {
        let status = session.status();
        assert!(session.start(now).is_err());
        assert!(session.pause(now).is_err());
        assert!(session.resume(now).is_err());
        assert!(session.advance_step(now).is_err());
        assert!(session.abort(None, now).is_err());
        assert_eq!(session.status(), status);
    }
}

#[test]
fn test_abort_from_paused_keeps_pause_accounting() {
    let start = Utc::now();
    let mut session = CookingSession::new(&recipe(2), SessionOptions::default(), start);
    session.start(start).unwrap();
    session.pause(start + TimeDelta::seconds(5)).unwrap();
    session.abort(None, start + TimeDelta::seconds(65)).unwrap();

    let summary = session.summary(start + TimeDelta::seconds(500));
    assert_eq!(summary.status, SessionStatus::Aborted);
    assert_eq!(summary.paused_duration_ms, 60_000);
    assert_eq!(summary.total_duration_ms, 65_000);
    assert!(summary.step_timings.is_empty());
}

#[test]
fn test_sensor_readings_are_tagged_with_current_step() {
    let now = Utc::now();
    let mut session = CookingSession::new(&recipe(2), SessionOptions::default(), now);
    session.start(now).unwrap();
    session
        .record_sensor_reading(SensorKind::Temperature, 180.0, now)
        .unwrap();
    session.advance_step(now).unwrap();
    session
        .record_sensor_reading(SensorKind::Custom("smoke".into()), 0.2, now)
        .unwrap();

    let steps: Vec<usize> = session.sensor_log().iter().map(|r| r.step_index).collect();
    assert_eq!(steps, vec![0, 1]);
    assert!(session
        .record_sensor_reading(SensorKind::Weight, f64::NAN, now)
        .is_err());
}

#[test]
fn test_quality_metrics_last_write_wins() {
    let now = Utc::now();
    let mut session = CookingSession::new(&recipe(1), SessionOptions::default(), now);
    session
        .record_quality_metric("crispness", MetricValue::Number(3.0), now)
        .unwrap();
    session
        .record_quality_metric("crispness", MetricValue::Number(4.0), now)
        .unwrap();

    assert_eq!(session.quality_metrics().len(), 1);
    assert_eq!(
        session.quality_metrics().get("crispness").unwrap().value,
        MetricValue::Number(4.0)
    );
}

#[tokio::test]
async fn test_service_unknown_session_is_not_found() {
    let resources = create_test_resources();
    let err = resources.cooking.advance(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_service_starts_session_in_progress() {
    let resources = create_test_resources();
    let recipe_id = create_recipe(&resources, 2);

    let session = resources
        .cooking
        .start_session(recipe_id, SessionOptions::default())
        .await
        .unwrap();
    assert_eq!(session.status(), SessionStatus::InProgress);
    assert_eq!(session.servings(), 2);

    let err = resources
        .cooking
        .resume(session.id())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
    assert_eq!(err.http_status(), 409);
}

#[tokio::test]
async fn test_concurrent_advances_count_each_step_once() {
    let resources = create_test_resources();
    let recipe_id = create_recipe(&resources, 5);
    let session_id = resources
        .cooking
        .start_session(recipe_id, SessionOptions::default())
        .await
        .unwrap()
        .id();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cooking = resources.cooking.clone();
            tokio::spawn(async move { cooking.advance(session_id).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    // Five steps: exactly five advances succeed, the rest hit Completed
    assert_eq!(successes, 5);
    let session = resources.cooking.session(session_id).await.unwrap();
    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(session.current_step(), 5);
}

struct RejectingHook {
    calls: AtomicUsize,
}

#[async_trait]
impl AutomationHook for RejectingHook {
    async fn on_sensor_reading(
        &self,
        _context: &AutomationContext,
    ) -> Result<(), CookingProcessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CookingProcessError::automation("oven offline"))
    }
}

#[tokio::test]
async fn test_automation_hook_only_runs_for_automated_sessions() {
    let hook = Arc::new(RejectingHook {
        calls: AtomicUsize::new(0),
    });
    let resources = ServerResources::with_automation(test_config(), hook.clone());
    let recipe_id = create_recipe(&resources, 2);

    let manual = resources
        .cooking
        .start_session(recipe_id, SessionOptions::default())
        .await
        .unwrap();
    resources
        .cooking
        .record_sensor(manual.id(), SensorKind::Temperature, 150.0)
        .await
        .unwrap();
    assert_eq!(hook.calls.load(Ordering::SeqCst), 0);

    let automated = resources
        .cooking
        .start_session(
            recipe_id,
            SessionOptions {
                automation_level: AutomationLevel::FullyAutomated,
                ..SessionOptions::default()
            },
        )
        .await
        .unwrap();
    let err = resources
        .cooking
        .record_sensor(automated.id(), SensorKind::Temperature, 150.0)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AutomationFailed);
    assert_eq!(hook.calls.load(Ordering::SeqCst), 1);

    // The reading stays logged even though the hook failed
    let session = resources.cooking.session(automated.id()).await.unwrap();
    assert_eq!(session.sensor_log().len(), 1);
}
