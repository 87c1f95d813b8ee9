//! Periodic removal of idle clients.
//!
//! Clients whose every admitted request has left the window hold no useful
//! state. The sweeper drops them so the client map only grows with active
//! traffic.

use crate::application::{admission::AdmissionController, ports::Storage};
use crate::domain::window::RequestLog;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "async")]
use tokio::{sync::oneshot, task::JoinHandle, time::interval};

/// Error returned when sweeper configuration validation fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SweeperConfigError {
    /// Sweep interval duration must be greater than zero
    #[error("sweep interval must be greater than 0")]
    ZeroInterval,
}

/// Configuration for idle-client sweeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweeperConfig {
    interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

impl SweeperConfig {
    /// Create a new sweeper config with the specified interval.
    ///
    /// # Errors
    /// Returns `SweeperConfigError::ZeroInterval` if `interval` is zero.
    pub fn new(interval: Duration) -> Result<Self, SweeperConfigError> {
        if interval.is_zero() {
            return Err(SweeperConfigError::ZeroInterval);
        }
        Ok(Self { interval })
    }

    /// How often a background sweep runs.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Error returned when stopping a background sweeper.
#[cfg(feature = "async")]
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// The sweep task panicked or was cancelled before it could stop cleanly
    #[error("sweeper task failed: {0}")]
    TaskFailed(String),
}

/// Drops idle clients from an admission controller.
pub struct IdleSweeper<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    controller: AdmissionController<S>,
    config: SweeperConfig,
}

impl<S> IdleSweeper<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    /// Create a sweeper over a (shared) controller.
    pub fn new(controller: AdmissionController<S>, config: SweeperConfig) -> Self {
        Self { controller, config }
    }

    /// Purge idle clients at the controller clock's current instant.
    ///
    /// Returns the number of clients removed.
    pub fn sweep(&self) -> usize {
        let now = self.controller.registry().now();
        self.controller.purge_idle(now)
    }

    /// Sweep periodically on a background tokio task.
    ///
    /// The first sweep runs after one full interval.
    #[cfg(feature = "async")]
    pub fn start(self) -> SweeperHandle
    where
        S: Send + Sync + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let join = tokio::spawn(async move {
            let mut ticker = interval(self.config.interval);
            // The first tick of a tokio interval completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.sweep();
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("idle sweeper stopping");
                        break;
                    }
                }
            }
        });

        SweeperHandle {
            shutdown_tx: Some(shutdown_tx),
            join: Some(join),
        }
    }

    /// Get the sweeper configuration.
    pub fn config(&self) -> &SweeperConfig {
        &self.config
    }

    /// Get a reference to the swept controller.
    pub fn controller(&self) -> &AdmissionController<S> {
        &self.controller
    }
}

impl<S> std::fmt::Debug for IdleSweeper<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdleSweeper")
            .field("interval", &self.config.interval)
            .field("clients", &self.controller.tracked_clients())
            .finish()
    }
}

/// Handle to a running background sweeper.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) also
/// stops the task, at its next wake-up.
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

#[cfg(feature = "async")]
impl SweeperHandle {
    /// Stop the sweeper and wait for its task to finish.
    pub async fn shutdown(mut self) -> Result<(), ShutdownError> {
        if let Some(tx) = self.shutdown_tx.take() {
            // The task may already be gone; the join below reports why.
            let _ = tx.send(());
        }
        match self.join.take() {
            Some(join) => join
                .await
                .map_err(|e| ShutdownError::TaskFailed(e.to_string())),
            None => Ok(()),
        }
    }

    /// Check whether the background task has finished.
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().map_or(true, |join| join.is_finished())
    }
}
