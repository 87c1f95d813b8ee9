//! Per-client admission control.
//!
//! The controller decides whether a request from a client may proceed under
//! the sliding-window policy and keeps the admission metrics.

use crate::application::metrics::Metrics;
use crate::application::ports::Storage;
use crate::application::registry::ClientRegistry;
use crate::domain::window::{Admission, RequestLog, SlidingWindow};
use std::time::Instant;

/// Coordinates admission decisions for all clients.
#[derive(Clone)]
pub struct AdmissionController<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    registry: ClientRegistry<S>,
    metrics: Metrics,
}

impl<S> AdmissionController<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    /// Create a new admission controller.
    ///
    /// # Arguments
    /// * `registry` - The client registry (which contains the clock and policy)
    /// * `metrics` - Metrics tracker
    pub fn new(registry: ClientRegistry<S>, metrics: Metrics) -> Self {
        Self { registry, metrics }
    }

    /// Decide whether a request from `client_id` arriving at `now` is admitted.
    ///
    /// Prune, count and append happen while the client's entry is held, so
    /// concurrent requests from one client can never both take the last slot.
    /// A rejection is not recorded and does not extend the client's wait.
    pub fn admit(&self, client_id: &str, now: Instant) -> Admission {
        let admission = self
            .registry
            .with_client_log(client_id, now, |log, policy| log.register(now, policy));

        if admission.allowed {
            self.metrics.record_admitted();
            tracing::debug!(
                client = client_id,
                remaining = admission.remaining,
                "request admitted"
            );
        } else {
            self.metrics.record_rejected();
            tracing::warn!(
                client = client_id,
                limit = self.policy().max_requests(),
                window_secs = self.policy().window().as_secs(),
                retry_after_ms = admission.retry_after.map(|d| d.as_millis() as u64),
                "rate limit exceeded"
            );
        }

        admission
    }

    /// Same as [`admit`](Self::admit) at the clock's current instant.
    pub fn check(&self, client_id: &str) -> Admission {
        let now = self.registry.now();
        self.admit(client_id, now)
    }

    /// Requests `client_id` could still make at `now`, without recording one.
    ///
    /// Unknown clients have the full quota.
    pub fn remaining(&self, client_id: &str, now: Instant) -> usize {
        self.registry
            .inspect(client_id, |log, policy| log.remaining(now, policy))
            .unwrap_or_else(|| self.policy().max_requests())
    }

    /// Forget clients with no admitted request left in the window at `now`.
    ///
    /// Returns the number of clients removed.
    pub fn purge_idle(&self, now: Instant) -> usize {
        let window = self.policy().window();
        let mut purged = 0;
        self.registry.cleanup(|_, log| {
            log.prune(now, window);
            let idle = log.is_empty();
            purged += usize::from(idle);
            !idle
        });

        if purged > 0 {
            self.metrics.record_purged(purged);
            tracing::debug!(purged, remaining_clients = self.registry.len(), "purged idle clients");
        }
        purged
    }

    /// The policy applied to every client.
    pub fn policy(&self) -> &SlidingWindow {
        self.registry.policy()
    }

    /// Get a reference to the registry.
    pub fn registry(&self) -> &ClientRegistry<S> {
        &self.registry
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.registry.len()
    }
}

impl<S> std::fmt::Debug for AdmissionController<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController")
            .field("registry", &self.registry)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}
