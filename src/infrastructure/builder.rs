//! Composition root for [`SummaryService`].
//!
//! The builder turns [`Settings`] into a wired service: sharded client
//! storage with LRU eviction, the sliding-window policy, metrics and the
//! summarizer with its stop-word list.

use crate::application::{
    admission::AdmissionController,
    metrics::Metrics,
    ports::{Clock, EvictionPolicy, Storage},
    registry::ClientRegistry,
    service::SummaryService,
    summarizer::Summarizer,
};
use crate::domain::{
    stopwords::StopwordFilter,
    window::{PolicyError, RequestLog, SlidingWindow},
};
use crate::infrastructure::{
    clock::SystemClock,
    eviction::LruEviction,
    settings::Settings,
    storage::{ClientStore, ShardedStorage},
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error returned when service configuration validation fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Rate limit or window is zero
    #[error("invalid rate limit policy: {0}")]
    Policy(#[from] PolicyError),
    /// Maximum tracked clients must be greater than zero
    #[error("max_tracked_clients must be greater than 0")]
    ZeroMaxClients,
    /// Minimum content length exceeds the maximum
    #[error("min_content_length ({min}) exceeds max_content_length ({max})")]
    InvalidContentBounds { min: usize, max: usize },
    /// Default sentence count not within `1..=cap`
    #[error("default_max_sentences ({default}) must be between 1 and max_sentences_cap ({cap})")]
    InvalidDefaultSentences { default: usize, cap: usize },
}

/// Builder for constructing a `SummaryService`.
#[derive(Debug)]
pub struct SummaryServiceBuilder {
    settings: Settings,
    clock: Option<Arc<dyn Clock>>,
    stopwords: Option<StopwordFilter>,
}

impl SummaryServiceBuilder {
    /// Replace all settings at once.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the per-client request limit and window.
    ///
    /// Validated when `build()` is called.
    pub fn with_rate_limit(mut self, max_requests: usize, window: Duration) -> Self {
        self.settings.rate_limit_requests = max_requests;
        self.settings.rate_limit_window = window;
        self
    }

    /// Set a custom clock (mainly for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a custom stop-word list instead of the English default.
    pub fn with_stopwords(mut self, stopwords: StopwordFilter) -> Self {
        self.stopwords = Some(stopwords);
        self
    }

    /// Set the maximum number of clients tracked at once.
    ///
    /// When the limit is reached, a new client replaces the least recently
    /// active client whose window has emptied. Clients with admitted requests
    /// still inside the window are never evicted; if every sampled client is
    /// active, the map grows past the limit until the idle sweeper or later
    /// evictions bring it back down.
    ///
    /// Default: 10,000 clients
    pub fn with_max_clients(mut self, max_clients: usize) -> Self {
        self.settings.max_tracked_clients = Some(max_clients);
        self
    }

    /// Disable the client limit.
    ///
    /// **Warning**: memory then grows with the number of distinct clients
    /// seen within one window. Pair this with an `IdleSweeper`.
    pub fn with_unlimited_clients(mut self) -> Self {
        self.settings.max_tracked_clients = None;
        self
    }

    /// Build the service.
    ///
    /// # Errors
    /// Returns `BuildError` if the configuration is invalid.
    pub fn build(self) -> Result<SummaryService<ClientStore>, BuildError> {
        validate(&self.settings)?;

        let metrics = Metrics::new();
        let mut storage = ShardedStorage::new().with_metrics(metrics.clone());
        if let Some(max) = self.settings.max_tracked_clients {
            let eviction: Arc<dyn EvictionPolicy<String>> = Arc::new(
                LruEviction::new(max).with_idle_after(self.settings.rate_limit_window),
            );
            storage = storage.with_eviction_policy(eviction);
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let stopwords = self.stopwords.unwrap_or_default();

        tracing::info!(
            app = %self.settings.app_name,
            version = %self.settings.version,
            rate_limit = self.settings.rate_limit_requests,
            window_secs = self.settings.rate_limit_window.as_secs(),
            max_clients = ?self.settings.max_tracked_clients,
            stopwords = stopwords.len(),
            "summary service configured"
        );

        assemble(self.settings, Arc::new(storage), clock, stopwords, metrics)
    }
}

impl SummaryService<ClientStore> {
    /// Create a builder for configuring the service.
    ///
    /// Defaults are those of [`Settings::default`], the system clock and the
    /// English stop-word list.
    pub fn builder() -> SummaryServiceBuilder {
        SummaryServiceBuilder {
            settings: Settings::default(),
            clock: None,
            stopwords: None,
        }
    }

    /// Create a service with custom client storage.
    ///
    /// `max_tracked_clients` is not applied here; bounding is up to the
    /// storage.
    ///
    /// # Errors
    /// Returns `BuildError` if the settings are invalid.
    pub fn with_storage<ST>(
        storage: ST,
        settings: Settings,
        clock: Arc<dyn Clock>,
    ) -> Result<SummaryService<ST>, BuildError>
    where
        ST: Storage<String, RequestLog> + Clone,
    {
        validate(&settings)?;
        assemble(
            settings,
            storage,
            clock,
            StopwordFilter::default(),
            Metrics::new(),
        )
    }
}

fn validate(settings: &Settings) -> Result<(), BuildError> {
    SlidingWindow::new(settings.rate_limit_requests, settings.rate_limit_window)?;

    if settings.max_tracked_clients == Some(0) {
        return Err(BuildError::ZeroMaxClients);
    }
    if settings.min_content_length > settings.max_content_length {
        return Err(BuildError::InvalidContentBounds {
            min: settings.min_content_length,
            max: settings.max_content_length,
        });
    }
    if settings.default_max_sentences == 0
        || settings.default_max_sentences > settings.max_sentences_cap
    {
        return Err(BuildError::InvalidDefaultSentences {
            default: settings.default_max_sentences,
            cap: settings.max_sentences_cap,
        });
    }
    Ok(())
}

fn assemble<ST>(
    settings: Settings,
    storage: ST,
    clock: Arc<dyn Clock>,
    stopwords: StopwordFilter,
    metrics: Metrics,
) -> Result<SummaryService<ST>, BuildError>
where
    ST: Storage<String, RequestLog> + Clone,
{
    let policy = SlidingWindow::new(settings.rate_limit_requests, settings.rate_limit_window)?;
    let registry = ClientRegistry::new(storage, clock, policy);
    let controller = AdmissionController::new(registry, metrics);
    Ok(SummaryService::from_parts(
        settings,
        controller,
        Summarizer::new(stopwords),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::{MockCaptureLayer, MockClock};
    use std::time::Instant;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_default_build() {
        let service = SummaryService::builder().build().unwrap();
        assert_eq!(service.settings(), &Settings::default());
        assert_eq!(service.admission().policy().max_requests(), 10);
        assert_eq!(
            service.admission().policy().window(),
            Duration::from_secs(60)
        );
        assert!(!service.summarizer().stopwords().is_empty());
    }

    #[test]
    fn test_build_validation() {
        assert_eq!(
            SummaryService::builder()
                .with_rate_limit(0, Duration::from_secs(60))
                .build()
                .unwrap_err(),
            BuildError::Policy(PolicyError::ZeroMaxRequests)
        );
        assert_eq!(
            SummaryService::builder()
                .with_rate_limit(10, Duration::ZERO)
                .build()
                .unwrap_err(),
            BuildError::Policy(PolicyError::ZeroWindow)
        );
        assert_eq!(
            SummaryService::builder()
                .with_max_clients(0)
                .build()
                .unwrap_err(),
            BuildError::ZeroMaxClients
        );

        let settings = Settings {
            min_content_length: 500,
            max_content_length: 100,
            ..Settings::default()
        };
        assert_eq!(
            SummaryService::builder()
                .with_settings(settings)
                .build()
                .unwrap_err(),
            BuildError::InvalidContentBounds { min: 500, max: 100 }
        );

        let settings = Settings {
            default_max_sentences: 21,
            ..Settings::default()
        };
        assert!(matches!(
            SummaryService::builder().with_settings(settings).build(),
            Err(BuildError::InvalidDefaultSentences {
                default: 21,
                cap: 20
            })
        ));
    }

    #[test]
    fn test_max_clients_evicts_least_recent_idle() {
        let start = Instant::now();
        let clock = MockClock::new(start);
        let service = SummaryService::builder()
            .with_rate_limit(5, Duration::from_secs(10))
            .with_clock(Arc::new(clock.clone()))
            .with_max_clients(2)
            .build()
            .unwrap();
        let admission = service.admission();

        admission.check("a");
        clock.advance(Duration::from_secs(1));
        admission.check("b");
        clock.advance(Duration::from_secs(1));
        admission.check("a");
        clock.advance(Duration::from_secs(10));
        admission.check("c");

        assert_eq!(admission.tracked_clients(), 2);
        assert!(admission.registry().inspect("b", |_, _| ()).is_none());
        assert_eq!(service.metrics().clients_evicted(), 1);
    }

    #[test]
    fn test_max_clients_keeps_active_clients() {
        let start = Instant::now();
        let clock = MockClock::new(start);
        let service = SummaryService::builder()
            .with_rate_limit(1, Duration::from_secs(60))
            .with_clock(Arc::new(clock.clone()))
            .with_max_clients(2)
            .build()
            .unwrap();
        let admission = service.admission();

        assert!(admission.check("a").is_allowed());
        clock.advance(Duration::from_secs(1));
        assert!(admission.check("b").is_allowed());
        clock.advance(Duration::from_secs(1));
        assert!(admission.check("c").is_allowed());

        assert_eq!(admission.tracked_clients(), 3);
        assert_eq!(service.metrics().clients_evicted(), 0);
        assert!(admission.check("a").is_rejected());
    }

    #[test]
    fn test_unlimited_clients() {
        let service = SummaryService::builder()
            .with_max_clients(1)
            .with_unlimited_clients()
            .build()
            .unwrap();
        for i in 0..50 {
            service.admission().check(&format!("client-{}", i));
        }
        assert_eq!(service.admission().tracked_clients(), 50);
        assert_eq!(service.metrics().clients_evicted(), 0);
    }

    #[test]
    fn test_with_custom_storage() {
        let storage: ClientStore = Arc::new(ShardedStorage::new());
        let service = SummaryService::with_storage(
            storage.clone(),
            Settings::default(),
            Arc::new(SystemClock::new()),
        )
        .unwrap();

        service.admission().check("shared");
        assert_eq!(Storage::len(&storage), 1);
    }

    #[test]
    fn test_build_logs_configuration() {
        let capture = MockCaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            SummaryService::builder().build().unwrap();
        });

        let events = capture.get_captured();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, tracing::Level::INFO);
        assert_eq!(events[0].message, "summary service configured");
    }
}
