// ABOUTME: Repository abstraction for cooking sessions and consumption profiles
// ABOUTME: Pluggable backend support with per-entity locking handles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Storage
//!
//! Services never touch a global map. They receive a [`Repository`] that
//! hands out [`Shared`] handles: one `Arc<Mutex<V>>` per entity, so requests
//! for different sessions or users run concurrently while mutations of the
//! same entity are serialized by its mutex.
//!
//! [`memory::InMemoryRepository`] is the only backend today. It is bounded
//! (LRU capacity) and drops entries that have been idle longer than their TTL.

/// In-memory repository with LRU eviction and idle expiry
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use crate::lifecycle::BackgroundTask;

/// Handle to one stored entity
pub type Shared<V> = Arc<Mutex<V>>;

/// Capacity and expiry policy of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Maximum number of entities kept; least recently used ones are evicted
    pub capacity: usize,
    /// Idle time after which an entity is dropped
    pub ttl: Duration,
}

/// Keyed store of independently lockable entities
#[async_trait]
pub trait Repository<K, V>: Send + Sync
where
    K: Send + Sync + 'static,
    V: Send + 'static,
{
    /// Store a new entity, replacing any previous one with the same key
    async fn insert(&self, key: K, value: V) -> Shared<V>;

    /// Fetch the handle of an entity, refreshing its idle timer
    async fn get(&self, key: &K) -> Option<Shared<V>>;

    /// Fetch an existing entity or store `value` under `key`
    ///
    /// Returns the handle and `true` when `value` was inserted.
    async fn get_or_insert(&self, key: K, value: V) -> (Shared<V>, bool);

    /// Number of stored entities
    async fn len(&self) -> usize;

    /// Whether the repository holds no entities
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop entities idle for longer than the TTL, returning how many went
    async fn evict_expired(&self) -> usize;

    /// Backend label for logs
    fn backend_name(&self) -> &'static str;
}

/// Background task that drops expired entities of one repository
pub struct RepositorySweepTask<K, V> {
    name: String,
    repository: Arc<dyn Repository<K, V>>,
    interval: Duration,
}

impl<K, V> RepositorySweepTask<K, V>
where
    K: Send + Sync + 'static,
    V: Send + 'static,
{
    /// Create a sweep task for `repository`, labelled `label` in logs
    #[must_use]
    pub fn new(label: &str, repository: Arc<dyn Repository<K, V>>, interval: Duration) -> Self {
        Self {
            name: format!("{label}-expiry"),
            repository,
            interval,
        }
    }
}

#[async_trait]
impl<K, V> BackgroundTask for RepositorySweepTask<K, V>
where
    K: Send + Sync + 'static,
    V: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run_once(&self) -> anyhow::Result<()> {
        let removed = self.repository.evict_expired().await;
        if removed > 0 {
            debug!(task = %self.name, backend = self.repository.backend_name(), "Expired {removed} entries");
        }
        Ok(())
    }
}
