// ABOUTME: Background task lifecycle management for periodic maintenance work
// ABOUTME: Runs interval tasks (sweeps, sensor polling) and stops them on shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Background Task Lifecycle
//!
//! Periodic work (rate-limit bucket cleanup, repository expiry, sensor
//! polling) is expressed as [`BackgroundTask`]s registered with a
//! [`TaskScheduler`]. Each task runs on its own fixed interval; nothing awaits
//! its results. `shutdown_all` signals every task and waits (bounded) for the
//! loops to exit.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// A unit of periodic work
#[async_trait]
pub trait BackgroundTask: Send + Sync {
    /// Task name used in logs
    fn name(&self) -> &str;

    /// Period between two runs
    fn interval(&self) -> Duration;

    /// Perform one run
    ///
    /// # Errors
    /// Returns an error if the run fails; the task keeps its schedule
    async fn run_once(&self) -> Result<()>;
}

/// Owns the spawned task loops and their shutdown signal
pub struct TaskScheduler {
    pending: Vec<Arc<dyn BackgroundTask>>,
    running: Vec<(String, JoinHandle<()>)>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_timeout: Duration,
}

impl TaskScheduler {
    /// Create an empty scheduler
    #[must_use]
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            pending: Vec::new(),
            running: Vec::new(),
            shutdown_tx,
            shutdown_timeout: Duration::from_secs(5),
        }
    }

    /// Register a task to be started by [`Self::start_all`]
    pub fn register(&mut self, task: Arc<dyn BackgroundTask>) {
        info!(
            "Registering background task '{}' (every {:?})",
            task.name(),
            task.interval()
        );
        self.pending.push(task);
    }

    /// Number of task loops currently spawned
    #[must_use]
    pub fn running(&self) -> usize {
        self.running.len()
    }

    /// Spawn every registered task
    pub fn start_all(&mut self) {
        for task in self.pending.drain(..) {
            let name = task.name().to_owned();
            let shutdown_rx = self.shutdown_tx.subscribe();
            let handle = tokio::spawn(Self::run_loop(task, shutdown_rx));
            self.running.push((name, handle));
        }
        info!("{} background tasks running", self.running.len());
    }

    async fn run_loop(task: Arc<dyn BackgroundTask>, mut shutdown_rx: watch::Receiver<bool>) {
        let period = task.interval().max(Duration::from_millis(1));
        // First run happens one period after start, not immediately
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = task.run_once().await {
                        warn!("Background task '{}' failed: {e:#}", task.name());
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        debug!("Background task '{}' received shutdown signal", task.name());
                        break;
                    }
                }
            }
        }
    }

    /// Signal every task to stop and wait for the loops to exit
    pub async fn shutdown_all(&mut self) {
        if self.running.is_empty() {
            return;
        }
        info!("Shutting down {} background tasks", self.running.len());
        // send() only fails when no receiver is alive, i.e. every loop already ended
        let _ = self.shutdown_tx.send(true);

        for (name, handle) in self.running.drain(..) {
            match tokio::time::timeout(self.shutdown_timeout, handle).await {
                Ok(Ok(())) => debug!("Background task '{}' stopped", name),
                Ok(Err(e)) => error!("Background task '{}' ended abnormally: {}", name, e),
                Err(_) => warn!(
                    "Background task '{}' did not stop within {:?}",
                    name, self.shutdown_timeout
                ),
            }
        }
        info!("All background tasks stopped");
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}
