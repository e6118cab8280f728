// ABOUTME: Shared server resources created once at startup and handed to every route
// ABOUTME: Wires repositories, services, hardware hub, rate limiter, and background tasks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::consumption::{ConsumptionProfile, ConsumptionService, MovingAverageForecaster};
use crate::cooking::{AutomationHook, CookingService, CookingSession, LoggingAutomationHook};
use crate::hardware::{SensorHub, SensorPollingTask, SimulatedSensorSource, UnavailableActuator};
use crate::lifecycle::BackgroundTask;
use crate::rate_limiting::{ClientRateLimiter, RateLimitCleanupTask};
use crate::recipes::RecipeCatalog;
use crate::storage::memory::InMemoryRepository;
use crate::storage::{Repository, RepositorySweepTask};

/// Actuators known to the simulated kitchen
const SIMULATED_ACTUATORS: [&str; 3] = ["oven", "mixer", "dispenser"];

/// Everything a request handler may need, shared through `Arc`
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Recipe catalog
    pub recipes: Arc<RecipeCatalog>,
    /// Cooking sessions
    pub cooking: CookingService,
    /// Consumption profiles
    pub consumption: ConsumptionService,
    /// Sensor and actuator hub
    pub hardware: Arc<SensorHub>,
    /// Per-client rate limiter
    pub rate_limiter: ClientRateLimiter,
    /// Process start, for uptime reporting
    pub started_at: Instant,
    sessions: Arc<dyn Repository<Uuid, CookingSession>>,
    profiles: Arc<dyn Repository<String, ConsumptionProfile>>,
}

impl ServerResources {
    /// Build resources with the logging automation hook
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self::with_automation(config, Arc::new(LoggingAutomationHook))
    }

    /// Build resources with a custom automation hook
    #[must_use]
    pub fn with_automation(config: ServerConfig, automation: Arc<dyn AutomationHook>) -> Self {
        let sessions: Arc<dyn Repository<Uuid, CookingSession>> = Arc::new(
            InMemoryRepository::new("cooking_sessions", config.storage.sessions()),
        );
        let profiles: Arc<dyn Repository<String, ConsumptionProfile>> = Arc::new(
            InMemoryRepository::new("consumption_profiles", config.storage.profiles()),
        );
        let recipes = Arc::new(RecipeCatalog::new());

        let cooking = CookingService::new(Arc::clone(&sessions), Arc::clone(&recipes), automation);
        let consumption = ConsumptionService::new(
            Arc::clone(&profiles),
            config.consumption.settings(),
            Arc::new(MovingAverageForecaster),
        );

        let hardware = SIMULATED_ACTUATORS.iter().fold(
            SensorHub::new(config.hardware.timeout())
                .with_source(Arc::new(SimulatedSensorSource::new("simulated-kitchen"))),
            |hub, name| hub.with_actuator(Arc::new(UnavailableActuator::new(*name))),
        );

        Self {
            rate_limiter: ClientRateLimiter::from_config(&config.rate_limit),
            config: Arc::new(config),
            recipes,
            cooking,
            consumption,
            hardware: Arc::new(hardware),
            started_at: Instant::now(),
            sessions,
            profiles,
        }
    }

    /// Periodic tasks implied by the configuration
    #[must_use]
    pub fn background_tasks(&self) -> Vec<Arc<dyn BackgroundTask>> {
        let sweep_interval = Duration::from_secs(self.config.storage.sweep_interval_secs);
        let mut tasks: Vec<Arc<dyn BackgroundTask>> = vec![
            Arc::new(RepositorySweepTask::new(
                "sessions",
                Arc::clone(&self.sessions),
                sweep_interval,
            )),
            Arc::new(RepositorySweepTask::new(
                "profiles",
                Arc::clone(&self.profiles),
                sweep_interval,
            )),
        ];

        if self.config.rate_limit.enabled {
            tasks.push(Arc::new(RateLimitCleanupTask::new(
                self.rate_limiter.clone(),
                Duration::from_secs(self.config.rate_limit.cleanup_interval_secs),
            )));
        }
        if self.config.hardware.sensor_polling_enabled {
            tasks.push(Arc::new(SensorPollingTask::new(
                Arc::clone(&self.hardware),
                self.config.hardware.poll_interval(),
            )));
        }
        tasks
    }

    /// Seconds since the resources were created
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_tasks_follow_config() {
        let mut config = ServerConfig::default();
        assert_eq!(ServerResources::new(config.clone()).background_tasks().len(), 4);

        config.rate_limit.enabled = false;
        config.hardware.sensor_polling_enabled = false;
        assert_eq!(ServerResources::new(config).background_tasks().len(), 2);
    }
}
