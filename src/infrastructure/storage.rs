//! Storage implementations for client state.
//!
//! Provides concurrent, sharded storage for per-client request logs.

use crate::application::metrics::Metrics;
use crate::application::ports::{EvictionCandidate, EvictionPolicy, LastAccess, Storage};
use crate::domain::window::RequestLog;
use ahash::RandomState;
use dashmap::DashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

/// Client storage used by `SummaryService::builder()`.
pub type ClientStore = Arc<ShardedStorage<String, RequestLog>>;

/// Thread-safe sharded storage backed by DashMap.
///
/// Each key lives in one shard guarded by its own lock. Accessing a key
/// through [`Storage::with_entry_mut`] holds that shard's write lock for the
/// whole accessor, so requests for different clients only contend when they
/// hash to the same shard.
///
/// With an eviction policy installed, inserting a new key into a full store
/// first removes the victim chosen by the policy. The policy only sees a
/// sample of at most [`DEFAULT_EVICTION_SAMPLE`] entries, so the victim is
/// the best one in the sample rather than in the whole store. When the
/// policy declines every sampled entry the insert proceeds anyway, and
/// concurrent inserts of new keys can overshoot the limit by the number of
/// racing inserters.
pub struct ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    map: DashMap<K, V, RandomState>,
    eviction: Option<Arc<dyn EvictionPolicy<K>>>,
    eviction_sample: usize,
    metrics: Option<Metrics>,
}

/// Entries handed to the eviction policy per eviction.
pub const DEFAULT_EVICTION_SAMPLE: usize = 64;

impl<K, V> ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new unbounded sharded storage instance.
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
            eviction: None,
            eviction_sample: DEFAULT_EVICTION_SAMPLE,
            metrics: None,
        }
    }

    /// Install an eviction policy that bounds the number of entries.
    pub fn with_eviction_policy(mut self, policy: Arc<dyn EvictionPolicy<K>>) -> Self {
        self.eviction = Some(policy);
        self
    }

    /// Number of entries sampled when looking for an eviction victim.
    ///
    /// Clamped to at least one.
    pub fn with_eviction_sample(mut self, sample: usize) -> Self {
        self.eviction_sample = sample.max(1);
        self
    }

    /// Count evictions in the given metrics.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Check if a key exists.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Remove a key and return its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(key)
    }
}

impl<K, V> ShardedStorage<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: LastAccess,
{
    /// Remove one entry chosen by the eviction policy, if it picks any.
    ///
    /// Candidates are collected first and the shard guards released before
    /// the removal, so this never runs while an entry guard is held.
    fn evict_one(&self, policy: &dyn EvictionPolicy<K>, now: Instant) {
        let candidates: Vec<EvictionCandidate<K>> = self
            .map
            .iter()
            .take(self.eviction_sample)
            .map(|entry| EvictionCandidate {
                key: entry.key().clone(),
                last_access: entry.value().last_access(),
            })
            .collect();

        match policy.select_victim(&candidates, now) {
            Some(victim) => {
                if self.map.remove(&victim).is_some() {
                    tracing::debug!(key = ?victim, "evicted least recently active entry");
                    if let Some(metrics) = &self.metrics {
                        metrics.record_eviction();
                    }
                }
            }
            None => {
                tracing::debug!(
                    sampled = candidates.len(),
                    entries = self.map.len(),
                    "no evictable entry, growing past the limit"
                );
            }
        }
    }
}

impl<K, V> Default for ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ShardedStorage<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedStorage")
            .field("len", &self.map.len())
            .field("eviction", &self.eviction)
            .finish()
    }
}

// Implement the Storage port
impl<K, V> Storage<K, V> for ShardedStorage<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + fmt::Debug,
    V: Send + Sync + LastAccess,
{
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        if let Some(policy) = &self.eviction {
            if !self.map.contains_key(&key) && policy.should_evict(self.map.len()) {
                let fresh = factory();
                self.evict_one(policy.as_ref(), fresh.last_access());
                let mut value_ref = self.map.entry(key).or_insert(fresh);
                return accessor(&mut value_ref);
            }
        }

        let mut value_ref = self.map.entry(key).or_insert_with(factory);
        accessor(&mut value_ref)
    }

    fn with_entry<Q, F, R>(&self, key: &Q, accessor: F) -> Option<R>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        self.map.get(key).map(|entry| accessor(entry.value()))
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn clear(&self) {
        self.map.clear()
    }

    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for entry in self.map.iter() {
            f(entry.key(), entry.value());
        }
    }

    fn retain<F>(&self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.map.retain(f);
    }
}

// Implement Storage for Arc<ShardedStorage> to allow it to be shared directly
impl<K, V> Storage<K, V> for Arc<ShardedStorage<K, V>>
where
    K: Hash + Eq + Clone + Send + Sync + fmt::Debug,
    V: Send + Sync + LastAccess,
{
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R,
    {
        (**self).with_entry_mut(key, factory, accessor)
    }

    fn with_entry<Q, F, R>(&self, key: &Q, accessor: F) -> Option<R>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        (**self).with_entry(key, accessor)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V),
    {
        (**self).for_each(f)
    }

    fn retain<F>(&self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        (**self).retain(f)
    }
}
