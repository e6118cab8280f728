// ABOUTME: In-memory repository implementation with LRU eviction and idle expiry
// ABOUTME: Expired entries are dropped lazily on access and by the sweep task
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{Repository, RepositoryConfig, Shared};
use async_trait::async_trait;
use lru::LruCache;
use std::fmt::Debug;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Stored entity together with its last access time
struct Entry<V> {
    value: Shared<V>,
    last_access: Instant,
}

impl<V> Entry<V> {
    fn new(value: V) -> Self {
        Self {
            value: Arc::new(Mutex::new(value)),
            last_access: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.last_access) >= ttl
    }
}

/// In-memory repository with LRU eviction
///
/// The LRU map only tracks entity handles; the entities themselves sit behind
/// their own mutex, so holding the map lock never waits on a slow request.
pub struct InMemoryRepository<K, V> {
    name: &'static str,
    store: RwLock<LruCache<K, Entry<V>>>,
    ttl: Duration,
}

impl<K, V> InMemoryRepository<K, V>
where
    K: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    V: Send + 'static,
{
    /// Capacity used when the configuration asks for zero entries
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a repository named `name` (used in log lines)
    #[must_use]
    pub fn new(name: &'static str, config: RepositoryConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            name,
            store: RwLock::new(LruCache::new(capacity)),
            ttl: config.ttl,
        }
    }

    fn push(&self, store: &mut LruCache<K, Entry<V>>, key: K, entry: Entry<V>) {
        if let Some((evicted, _)) = store.push(key.clone(), entry) {
            if evicted != key {
                debug!(repository = self.name, key = ?evicted, "Evicted least recently used entry");
            }
        }
    }
}

#[async_trait]
impl<K, V> Repository<K, V> for InMemoryRepository<K, V>
where
    K: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    V: Send + 'static,
{
    async fn insert(&self, key: K, value: V) -> Shared<V> {
        let entry = Entry::new(value);
        let handle = entry.value.clone();
        let mut store = self.store.write().await;
        self.push(&mut store, key, entry);
        drop(store);
        handle
    }

    async fn get(&self, key: &K) -> Option<Shared<V>> {
        let now = Instant::now();
        let mut store = self.store.write().await;

        // LruCache::get_mut is mutable (updates access order for LRU)
        let expired = match store.get_mut(key) {
            Some(entry) if !entry.is_expired(self.ttl, now) => {
                entry.last_access = now;
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            store.pop(key);
            debug!(repository = self.name, key = ?key, "Dropped expired entry on access");
        }
        None
    }

    async fn get_or_insert(&self, key: K, value: V) -> (Shared<V>, bool) {
        let now = Instant::now();
        let mut store = self.store.write().await;

        if let Some(entry) = store.get_mut(&key) {
            if !entry.is_expired(self.ttl, now) {
                entry.last_access = now;
                return (entry.value.clone(), false);
            }
        }

        let entry = Entry::new(value);
        let handle = entry.value.clone();
        self.push(&mut store, key, entry);
        drop(store);
        (handle, true)
    }

    async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut store = self.store.write().await;

        // Collect expired keys first (can't modify while iterating)
        let expired_keys: Vec<K> = store
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.ttl, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            store.pop(key);
        }
        drop(store);

        let removed = expired_keys.len();
        if removed > 0 {
            debug!(repository = self.name, removed, "Swept expired entries");
        }
        removed
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
