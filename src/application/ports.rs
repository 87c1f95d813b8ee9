//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;

/// Candidate entry for eviction consideration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionCandidate<K> {
    /// The key of the entry
    pub key: K,
    /// Last access time for LRU-based strategies
    pub last_access: Instant,
}

/// Values that remember when they were last used.
///
/// Storage adapters read this to build eviction candidates.
pub trait LastAccess {
    /// The most recent access to this value.
    fn last_access(&self) -> Instant;
}

/// Port for eviction policy decisions.
///
/// The storage layer delegates the choice of which key to drop, and when,
/// to a pluggable policy.
pub trait EvictionPolicy<K>: Send + Sync + Debug
where
    K: Clone,
{
    /// Select a victim from the given candidates for eviction.
    ///
    /// `now` is the access time of the entry about to be inserted.
    ///
    /// # Returns
    /// The key of the entry to evict, or None if no candidate may be evicted
    fn select_victim(&self, candidates: &[EvictionCandidate<K>], now: Instant) -> Option<K>;

    /// Check if inserting one more entry requires an eviction first.
    fn should_evict(&self, current_entries: usize) -> bool;
}

/// Port for obtaining current time.
///
/// Infrastructure provides concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for concurrent key-value storage.
///
/// Implementations must run `accessor` while holding exclusive access to the
/// entry, so that a read-modify-write inside the accessor is atomic with
/// respect to other callers using the same key.
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Access an entry with mutable access, creating it if necessary.
    ///
    /// # Arguments
    /// * `key` - The key to look up
    /// * `factory` - Function to create a new value if the key doesn't exist
    /// * `accessor` - Function that gets mutable access to the value
    ///
    /// # Returns
    /// The result from the accessor function
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R;

    /// Read an existing entry without creating it.
    fn with_entry<Q, F, R>(&self, key: &Q, accessor: F) -> Option<R>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R;

    /// Get the number of entries in the storage.
    fn len(&self) -> usize;

    /// Check if the storage is empty.
    fn is_empty(&self) -> bool;

    /// Clear all entries from the storage.
    fn clear(&self);

    /// Iterate over all entries, providing access to both key and value.
    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&K, &V);

    /// Remove entries for which the predicate returns false.
    fn retain<F>(&self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool;
}
