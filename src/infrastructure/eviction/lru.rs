//! LRU (Least Recently Used) eviction adapter.

use crate::application::ports::{EvictionCandidate, EvictionPolicy};
use std::time::{Duration, Instant};

/// LRU eviction policy with an entry count limit.
///
/// Once `max_entries` keys are stored, admitting a new key evicts the one
/// whose last access is oldest. Ties go to the first candidate seen.
///
/// With [`with_idle_after`](Self::with_idle_after), only entries untouched
/// for at least that long may be evicted. When none qualifies nothing is
/// evicted and the store grows past `max_entries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruEviction {
    max_entries: usize,
    idle_after: Option<Duration>,
}

impl LruEviction {
    /// Create a new LRU eviction policy with the given entry limit.
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            idle_after: None,
        }
    }

    /// Only evict entries whose last access is at least `idle_after` old.
    pub fn with_idle_after(mut self, idle_after: Duration) -> Self {
        self.idle_after = Some(idle_after);
        self
    }

    /// The configured entry limit.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// The minimum idle time of an evictable entry, if any.
    pub fn idle_after(&self) -> Option<Duration> {
        self.idle_after
    }

    fn is_evictable(&self, last_access: Instant, now: Instant) -> bool {
        self.idle_after
            .map_or(true, |idle| now.saturating_duration_since(last_access) >= idle)
    }
}

impl<K> EvictionPolicy<K> for LruEviction
where
    K: Clone,
{
    fn select_victim(&self, candidates: &[EvictionCandidate<K>], now: Instant) -> Option<K> {
        candidates
            .iter()
            .filter(|candidate| self.is_evictable(candidate.last_access, now))
            .min_by_key(|candidate| candidate.last_access)
            .map(|candidate| candidate.key.clone())
    }

    fn should_evict(&self, current_entries: usize) -> bool {
        current_entries >= self.max_entries
    }
}
