//! Mock clock for testing.

use crate::application::ports::Clock;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Clock whose time only moves when a test says so.
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to a service.
///
/// ```
/// use textdigest::infrastructure::mocks::MockClock;
/// use textdigest::SummaryService;
/// use std::sync::Arc;
/// use std::time::{Duration, Instant};
///
/// let clock = MockClock::new(Instant::now());
/// let service = SummaryService::builder()
///     .with_rate_limit(1, Duration::from_secs(60))
///     .with_clock(Arc::new(clock.clone()))
///     .build()
///     .unwrap();
///
/// assert!(service.admission().check("a").is_allowed());
/// assert!(service.admission().check("a").is_rejected());
///
/// clock.advance(Duration::from_secs(60));
/// assert!(service.admission().check("a").is_allowed());
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    current_time: Arc<Mutex<Instant>>,
}

impl MockClock {
    /// Create a mock clock starting at a specific instant.
    pub fn new(start: Instant) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
        }
    }

    fn time(&self) -> MutexGuard<'_, Instant> {
        self.current_time
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        *self.time() += duration;
    }

    /// Set the clock to a specific instant.
    pub fn set(&self, instant: Instant) {
        *self.time() = instant;
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self.time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock() {
        let start = Instant::now();
        let clock = MockClock::new(start);

        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now(), start + Duration::from_secs(10));

        let new_time = start + Duration::from_secs(100);
        clock.set(new_time);
        assert_eq!(clock.now(), new_time);
    }

    #[test]
    fn test_clones_share_time() {
        let start = Instant::now();
        let clock = MockClock::new(start);
        let other = clock.clone();

        std::thread::spawn(move || other.advance(Duration::from_secs(5)))
            .join()
            .unwrap();
        assert_eq!(clock.now(), start + Duration::from_secs(5));
    }
}
