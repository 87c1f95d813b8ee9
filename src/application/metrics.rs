//! Observability metrics for admission control.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking admission statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total number of requests admitted
    requests_admitted: AtomicU64,
    /// Total number of requests rejected for exceeding the rate limit
    requests_rejected: AtomicU64,
    /// Clients dropped because the client table was full
    clients_evicted: AtomicU64,
    /// Clients dropped because their window emptied
    clients_purged: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                requests_admitted: AtomicU64::new(0),
                requests_rejected: AtomicU64::new(0),
                clients_evicted: AtomicU64::new(0),
                clients_purged: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_admitted(&self) {
        self.inner.requests_admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.inner.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.inner.clients_evicted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_purged(&self, count: usize) {
        self.inner
            .clients_purged
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get the total number of requests admitted.
    pub fn requests_admitted(&self) -> u64 {
        self.inner.requests_admitted.load(Ordering::Relaxed)
    }

    /// Get the total number of requests rejected.
    pub fn requests_rejected(&self) -> u64 {
        self.inner.requests_rejected.load(Ordering::Relaxed)
    }

    /// Get the total number of clients evicted at capacity.
    pub fn clients_evicted(&self) -> u64 {
        self.inner.clients_evicted.load(Ordering::Relaxed)
    }

    /// Get the total number of idle clients purged.
    pub fn clients_purged(&self) -> u64 {
        self.inner.clients_purged.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_admitted: self.requests_admitted(),
            requests_rejected: self.requests_rejected(),
            clients_evicted: self.clients_evicted(),
            clients_purged: self.clients_purged(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.requests_admitted.store(0, Ordering::Relaxed);
        self.inner.requests_rejected.store(0, Ordering::Relaxed);
        self.inner.clients_evicted.store(0, Ordering::Relaxed);
        self.inner.clients_purged.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total number of requests admitted
    pub requests_admitted: u64,
    /// Total number of requests rejected
    pub requests_rejected: u64,
    /// Clients evicted at capacity
    pub clients_evicted: u64,
    /// Idle clients purged
    pub clients_purged: u64,
}

impl MetricsSnapshot {
    /// Ratio of rejected requests to all requests (0.0 to 1.0).
    ///
    /// Returns 0.0 if no requests have been processed.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.requests_rejected as f64 / total as f64
        }
    }

    /// Get the total number of requests processed (admitted + rejected).
    pub fn total_requests(&self) -> u64 {
        self.requests_admitted.saturating_add(self.requests_rejected)
    }
}
