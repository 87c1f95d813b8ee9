//! Central registry of per-client request logs.
//!
//! The registry owns the client map, the clock and the shared sliding-window
//! policy. It is cheap to clone; clones share the same map.

use crate::application::ports::{Clock, LastAccess, Storage};
use crate::domain::window::{RequestLog, SlidingWindow};
use std::sync::Arc;
use std::time::Instant;

/// A client is as recent as its newest admitted request. Rejected attempts
/// do not count, so a log whose newest entry has left the window is idle.
impl LastAccess for RequestLog {
    fn last_access(&self) -> Instant {
        self.newest().unwrap_or_else(|| self.last_seen())
    }
}

/// Registry managing the request logs of all clients.
///
/// Generic over the storage implementation. In production, use
/// `Arc<ShardedStorage<String, RequestLog>>`.
#[derive(Clone)]
pub struct ClientRegistry<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    storage: S,
    clock: Arc<dyn Clock>,
    policy: SlidingWindow,
}

impl<S> ClientRegistry<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    /// Create a new registry with storage, clock and the admission policy.
    pub fn new(storage: S, clock: Arc<dyn Clock>, policy: SlidingWindow) -> Self {
        Self {
            storage,
            clock,
            policy,
        }
    }

    /// Access or create the log of a client.
    ///
    /// The callback runs while the client's entry is exclusively held, so
    /// everything it does to the log is atomic with respect to other requests
    /// from the same client.
    pub fn with_client_log<F, R>(&self, client_id: &str, now: Instant, f: F) -> R
    where
        F: FnOnce(&mut RequestLog, &SlidingWindow) -> R,
    {
        let policy = &self.policy;
        self.storage.with_entry_mut(
            client_id.to_owned(),
            || RequestLog::new(now),
            |log| f(log, policy),
        )
    }

    /// Read the log of a known client without creating one.
    pub fn inspect<F, R>(&self, client_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&RequestLog, &SlidingWindow) -> R,
    {
        let policy = &self.policy;
        self.storage.with_entry(client_id, |log| f(log, policy))
    }

    /// Current time according to the registry's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// The admission policy shared by all clients.
    pub fn policy(&self) -> &SlidingWindow {
        &self.policy
    }

    /// Get the number of tracked clients.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if no client is tracked.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Forget every client.
    pub fn clear(&self) {
        self.storage.clear();
    }

    /// Iterate over all client logs with a callback.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&String, &RequestLog),
    {
        self.storage.for_each(f);
    }

    /// Remove clients for which the predicate returns false.
    pub fn cleanup<F>(&self, f: F)
    where
        F: FnMut(&String, &mut RequestLog) -> bool,
    {
        self.storage.retain(f);
    }
}

impl<S> std::fmt::Debug for ClientRegistry<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("clients", &self.storage.len())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::storage::ShardedStorage;
    use std::time::Duration;

    fn registry() -> ClientRegistry<Arc<ShardedStorage<String, RequestLog>>> {
        let storage = Arc::new(ShardedStorage::new());
        let clock = Arc::new(SystemClock::new());
        let policy = SlidingWindow::new(3, Duration::from_secs(60)).unwrap();
        ClientRegistry::new(storage, clock, policy)
    }

    #[test]
    fn test_registry_creation() {
        let registry = registry();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
        assert_eq!(registry.policy().max_requests(), 3);
    }

    #[test]
    fn test_with_client_log_creates_lazily() {
        let registry = registry();
        let now = registry.now();

        assert!(registry.inspect("10.0.0.1", |log, _| log.len()).is_none());

        registry.with_client_log("10.0.0.1", now, |log, policy| {
            log.register(now, policy);
        });
        registry.with_client_log("10.0.0.1", now, |log, policy| {
            log.register(now, policy);
        });

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.inspect("10.0.0.1", |log, _| log.len()), Some(2));
    }

    #[test]
    fn test_cleanup_and_clear() {
        let registry = registry();
        let now = registry.now();

        for i in 0..6 {
            registry.with_client_log(&format!("client-{}", i), now, |log, policy| {
                if i % 2 == 0 {
                    log.register(now, policy);
                }
            });
        }
        assert_eq!(registry.len(), 6);

        registry.cleanup(|_, log| !log.is_empty());
        assert_eq!(registry.len(), 3);

        let mut ids = Vec::new();
        registry.for_each(|id, _| ids.push(id.clone()));
        ids.sort();
        assert_eq!(ids, vec!["client-0", "client-2", "client-4"]);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        use std::thread;

        let registry = Arc::new(registry());
        let now = registry.now();
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for j in 0..100 {
                        registry.with_client_log(&format!("c_{}_{}", i, j), now, |_, _| ());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 1000);
    }
}
