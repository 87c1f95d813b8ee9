//! Sliding-window admission policy.
//!
//! A client may make at most `max_requests` admitted requests in any window
//! of `window` length ending at "now". Each client owns a [`RequestLog`] of
//! admitted timestamps; stale entries are pruned lazily whenever the log is
//! touched.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Error returned when a policy is configured with impossible values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// At least one request per window must be allowed
    #[error("max_requests must be greater than 0")]
    ZeroMaxRequests,
    /// The window must have a positive length
    #[error("window duration must be greater than 0")]
    ZeroWindow,
}

/// Limits shared by every client: `max_requests` per `window`.
///
/// # Example
/// ```
/// use textdigest::{RequestLog, SlidingWindow};
/// use std::time::{Duration, Instant};
///
/// let policy = SlidingWindow::new(2, Duration::from_secs(60)).unwrap();
/// let now = Instant::now();
/// let mut log = RequestLog::new(now);
///
/// assert!(log.register(now, &policy).allowed);
/// assert!(log.register(now, &policy).allowed);
/// assert!(!log.register(now, &policy).allowed);
///
/// // The window slides: one full window after the first request it has expired.
/// let later = now + Duration::from_secs(60);
/// assert!(log.register(later, &policy).allowed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidingWindow {
    max_requests: usize,
    window: Duration,
}

impl SlidingWindow {
    /// Create a policy allowing `max_requests` per `window`.
    ///
    /// # Errors
    /// Returns `PolicyError` if either value is zero.
    pub fn new(max_requests: usize, window: Duration) -> Result<Self, PolicyError> {
        if max_requests == 0 {
            return Err(PolicyError::ZeroMaxRequests);
        }
        if window.is_zero() {
            return Err(PolicyError::ZeroWindow);
        }
        Ok(Self {
            max_requests,
            window,
        })
    }

    /// Maximum admitted requests per window.
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Length of the sliding window.
    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Result of one admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests still available in the current window
    pub remaining: usize,
    /// Time until the oldest admitted request leaves the window.
    ///
    /// Only set on rejection.
    pub retry_after: Option<Duration>,
}

impl Admission {
    /// An admitted request.
    pub fn admitted(remaining: usize) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after: None,
        }
    }

    /// A rejected request.
    pub fn rejected(retry_after: Duration) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after: Some(retry_after),
        }
    }

    /// Check if the request was admitted.
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Check if the request was rejected.
    pub fn is_rejected(&self) -> bool {
        !self.allowed
    }
}

/// Admitted request timestamps of a single client.
#[derive(Debug, Clone)]
pub struct RequestLog {
    timestamps: VecDeque<Instant>,
    last_seen: Instant,
}

impl RequestLog {
    /// Create an empty log for a client first seen at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            timestamps: VecDeque::new(),
            last_seen: now,
        }
    }

    /// Drop entries for which `now - entry >= window`.
    ///
    /// Timestamps are appended in arrival order, so expired entries are
    /// always at the front. An entry later than `now` is never pruned.
    pub fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.timestamps.front() {
            if now.saturating_duration_since(oldest) >= window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Prune, then admit and record `now` if the client has quota left.
    ///
    /// A rejected attempt is not recorded, so rejections never extend the
    /// time a client has to wait.
    ///
    /// `now` is clamped to the newest recorded timestamp. A caller that read
    /// the clock before a racing request took the entry counts as arriving
    /// at the same instant, which keeps the log sorted.
    pub fn register(&mut self, now: Instant, policy: &SlidingWindow) -> Admission {
        let now = self.timestamps.back().map_or(now, |&newest| newest.max(now));
        self.last_seen = self.last_seen.max(now);
        self.prune(now, policy.window);

        if self.timestamps.len() >= policy.max_requests {
            return Admission::rejected(self.retry_after(now, policy));
        }

        self.timestamps.push_back(now);
        Admission::admitted(policy.max_requests - self.timestamps.len())
    }

    /// Requests still available at `now`, without recording anything.
    pub fn remaining(&self, now: Instant, policy: &SlidingWindow) -> usize {
        let live = self
            .timestamps
            .iter()
            .filter(|&&t| now.saturating_duration_since(t) < policy.window)
            .count();
        policy.max_requests.saturating_sub(live)
    }

    /// Time until the oldest recorded entry leaves the window.
    ///
    /// Zero when the log is empty or the oldest entry has already expired.
    pub fn retry_after(&self, now: Instant, policy: &SlidingWindow) -> Duration {
        self.timestamps
            .front()
            .map(|&oldest| (oldest + policy.window).saturating_duration_since(now))
            .unwrap_or_default()
    }

    /// Number of recorded timestamps (may include stale ones until pruned).
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the log holds no timestamps.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Recorded timestamps, oldest first.
    pub fn timestamps(&self) -> impl Iterator<Item = Instant> + '_ {
        self.timestamps.iter().copied()
    }

    /// Most recent admitted timestamp.
    pub fn newest(&self) -> Option<Instant> {
        self.timestamps.back().copied()
    }

    /// Latest admission attempt by this client, admitted or not.
    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }
}
