//! # textdigest
//!
//! Extractive document summarization behind per-client sliding-window rate
//! limiting.
//!
//! The crate is the core of a summarization HTTP service without the HTTP:
//! a [`SummaryService`] applies the request size gate, admits or rejects the
//! caller, validates the input and returns the most salient sentences of the
//! document. Any web framework can sit in front of it; errors carry the status
//! code and JSON body to answer with.
//!
//! ## Quick Start
//!
//! ```rust
//! use textdigest::{SummarizeRequest, SummaryService};
//!
//! let service = SummaryService::builder().build().unwrap();
//!
//! let text = "Rust is a systems programming language. \
//!             Rust guarantees memory safety without a garbage collector. \
//!             Many teams adopt Rust for reliability. \
//!             The weather was pleasant yesterday. \
//!             Rust tooling includes cargo and clippy.";
//! let request = SummarizeRequest::new(text).with_max_sentences(2);
//!
//! let response = service.summarize("203.0.113.7", &request).unwrap();
//! assert!(response.value.truncated);
//! assert_eq!(response.value.sentences_count, 2);
//! assert_eq!(response.remaining, 9);
//! ```
//!
//! ## Summarization
//!
//! [`Summarizer::summarize`] is a pure function of the text and the sentence
//! budget:
//!
//! 1. Whitespace runs collapse to single spaces.
//! 2. The text splits into sentences after `.`, `!` or `?` followed by
//!    whitespace. Abbreviations such as `Dr.` or `e.g.` and single-letter
//!    initials do not end a sentence.
//! 3. If the document already fits the budget it is returned whole.
//! 4. Otherwise every non-stop-word token is counted, counts are divided by
//!    the highest count, and each sentence scores the average weight of its
//!    tokens.
//! 5. The best sentences are picked (earlier sentence wins a tie) and joined
//!    in document order.
//!
//! Sentences without any alphanumeric token are never picked.
//!
//! ## Admission Control
//!
//! Each client may make `rate_limit_requests` admitted requests in any window
//! of `rate_limit_window`. Rejected attempts are not recorded. The
//! prune-count-append sequence for a client runs while its entry in a sharded
//! [`DashMap`](dashmap::DashMap) is exclusively held, so concurrent requests
//! from one client can never overshoot the limit:
//!
//! ```rust
//! use textdigest::SummaryService;
//! use std::time::{Duration, Instant};
//!
//! let service = SummaryService::builder()
//!     .with_rate_limit(2, Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//! let admission = service.admission();
//! let start = Instant::now();
//!
//! assert!(admission.admit("a", start).is_allowed());
//! assert!(admission.admit("a", start).is_allowed());
//! assert!(admission.admit("a", start).is_rejected());
//! assert!(admission.admit("b", start).is_allowed());
//!
//! // A request leaves the window exactly one window after it was admitted.
//! assert!(admission.admit("a", start + Duration::from_secs(10)).is_allowed());
//! ```
//!
//! ## Memory Management
//!
//! At most 10,000 clients are tracked by default. A new client arriving at
//! the limit evicts the least recently active client whose window has
//! emptied; clients still inside their window are never evicted. Use
//! `.with_max_clients(n)` or `.with_unlimited_clients()` to change this, and
//! an [`IdleSweeper`] to drop clients whose window has emptied:
//!
//! ```rust
//! # use textdigest::{SummaryService, SweeperConfig};
//! # use std::time::Duration;
//! let service = SummaryService::builder()
//!     .with_max_clients(50_000)
//!     .build()
//!     .unwrap();
//!
//! let sweeper = service.idle_sweeper(SweeperConfig::new(Duration::from_secs(30)).unwrap());
//! let purged = sweeper.sweep();
//! assert_eq!(purged, 0);
//! ```
//!
//! With the `async` feature, `sweeper.start()` runs the sweep on a tokio
//! interval and returns a handle for graceful shutdown.
//!
//! ## Configuration
//!
//! [`Settings::from_env`] reads `MAX_CONTENT_LENGTH`, `RATE_LIMIT_REQUESTS`,
//! `RATE_LIMIT_WINDOW` and friends, falling back to defaults:
//!
//! ```rust,no_run
//! use textdigest::{Settings, SummaryService};
//!
//! let settings = Settings::from_env().expect("invalid environment");
//! let service = SummaryService::builder()
//!     .with_settings(settings)
//!     .build()
//!     .expect("invalid configuration");
//! ```
//!
//! ## Observability
//!
//! Decisions are logged through `tracing`: `debug` for admissions and
//! summaries, `warn` for rejections (with `client` and `limit` fields),
//! `info` once when the service is built. Counters are available from
//! [`Metrics`]:
//!
//! ```rust
//! # use textdigest::SummaryService;
//! # let service = SummaryService::builder().build().unwrap();
//! let snapshot = service.metrics().snapshot();
//! println!("rejection rate: {:.2}%", snapshot.rejection_rate() * 100.0);
//! ```

// Domain layer - pure text processing and the sliding-window policy
pub mod domain;

// Application layer - admission, summarization and the service boundary
pub mod application;

// Infrastructure layer - storage, clocks, settings and wiring
pub mod infrastructure;

pub use domain::{
    frequency::WordFrequencyTable,
    stopwords::StopwordFilter,
    summary::SummaryResult,
    text::{normalize_whitespace, split_sentences, tokenize, Sentence},
    window::{Admission, PolicyError, RequestLog, SlidingWindow},
};

pub use application::{
    admission::AdmissionController,
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, EvictionPolicy, LastAccess, Storage},
    registry::ClientRegistry,
    service::{
        Admitted, ErrorBody, HealthReport, RequestError, ServiceInfo, SummarizeRequest,
        SummaryService,
    },
    summarizer::Summarizer,
    sweeper::{IdleSweeper, SweeperConfig, SweeperConfigError},
};

#[cfg(feature = "async")]
pub use application::sweeper::{ShutdownError, SweeperHandle};

pub use infrastructure::{
    builder::{BuildError, SummaryServiceBuilder},
    clock::SystemClock,
    eviction::LruEviction,
    settings::{Settings, SettingsError},
    storage::{ClientStore, ShardedStorage},
};
