//! Request boundary of the summary service.
//!
//! `SummaryService` is what an HTTP handler talks to. It applies the request
//! size gate, admission control and input validation in that order, then runs
//! the summarizer. Transport concerns (routing, JSON framing, multipart
//! decoding) stay with the caller; errors carry the status code and body an
//! HTTP layer should send back.

use crate::application::{
    admission::AdmissionController,
    metrics::Metrics,
    ports::Storage,
    summarizer::Summarizer,
    sweeper::{IdleSweeper, SweeperConfig},
};
use crate::domain::{summary::SummaryResult, window::RequestLog};
use crate::infrastructure::{settings::Settings, storage::ClientStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// File extensions accepted by [`SummaryService::summarize_upload`].
const UPLOAD_EXTENSIONS: &[&str] = &[".txt", ".md"];

/// Body of a summarize request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    /// Document to summarize
    pub text: String,
    /// Sentences wanted; the configured default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sentences: Option<usize>,
}

impl SummarizeRequest {
    /// A request for the default number of sentences.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            max_sentences: None,
        }
    }

    /// Ask for a specific number of sentences.
    pub fn with_max_sentences(mut self, max_sentences: usize) -> Self {
        self.max_sentences = Some(max_sentences);
        self
    }
}

/// A successful response together with the caller's remaining quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted<T> {
    pub value: T,
    /// Requests the client may still make in the current window
    pub remaining: usize,
}

impl<T> Admitted<T> {
    /// Discard the quota information.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Reasons a request is turned away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Body larger than the configured maximum
    #[error("Content too large. Maximum size: {max_size} bytes")]
    PayloadTooLarge { size: usize, max_size: usize },

    /// Client exhausted its quota for the current window
    #[error("Rate limit exceeded. Max {limit} requests per {} seconds.", .window.as_secs())]
    RateLimited {
        limit: usize,
        window: Duration,
        retry_after: Option<Duration>,
    },

    /// Document length (in characters) outside the accepted range
    #[error("Text length must be between {min} and {max} characters, got {length}")]
    InvalidLength {
        length: usize,
        min: usize,
        max: usize,
    },

    #[error("Text cannot be empty or whitespace only")]
    BlankText,

    #[error("max_sentences must be between 1 and {cap}, got {requested}")]
    MaxSentencesOutOfRange { requested: usize, cap: usize },

    #[error("Only .txt and .md files are supported")]
    UnsupportedFileType { filename: String },

    #[error("File must be valid UTF-8 text")]
    InvalidUtf8,
}

impl RequestError {
    /// HTTP status an HTTP layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            RequestError::UnsupportedFileType { .. } | RequestError::InvalidUtf8 => 400,
            RequestError::PayloadTooLarge { .. } => 413,
            RequestError::InvalidLength { .. }
            | RequestError::BlankText
            | RequestError::MaxSentencesOutOfRange { .. } => 422,
            RequestError::RateLimited { .. } => 429,
        }
    }

    /// Serializable error body.
    pub fn body(&self) -> ErrorBody {
        let mut body = ErrorBody {
            detail: self.to_string(),
            rate_limit: None,
            window_seconds: None,
            max_size: None,
        };
        match self {
            RequestError::RateLimited { limit, window, .. } => {
                body.rate_limit = Some(*limit);
                body.window_seconds = Some(window.as_secs());
            }
            RequestError::PayloadTooLarge { max_size, .. } => {
                body.max_size = Some(*max_size);
            }
            _ => {}
        }
        body
    }

    /// Check if this error comes from admission control.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RequestError::RateLimited { .. })
    }
}

/// JSON error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<usize>,
}

/// Health probe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub model_ready: bool,
    /// Configured per-window request limit
    pub requests_remaining: usize,
}

/// Service description served at the root path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

/// Summarization behind admission control and input validation.
///
/// Cheap to clone; clones share client state, metrics and the summarizer.
/// Build one with `SummaryService::builder()`.
#[derive(Clone)]
pub struct SummaryService<S = ClientStore>
where
    S: Storage<String, RequestLog> + Clone,
{
    settings: Arc<Settings>,
    controller: AdmissionController<S>,
    summarizer: Arc<Summarizer>,
}

impl<S> SummaryService<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    /// Assemble a service from already validated parts.
    pub(crate) fn from_parts(
        settings: Settings,
        controller: AdmissionController<S>,
        summarizer: Summarizer,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            controller,
            summarizer: Arc::new(summarizer),
        }
    }

    /// Summarize a JSON request body on behalf of `client_id`.
    ///
    /// # Errors
    /// In evaluation order: `PayloadTooLarge`, `RateLimited`, `InvalidLength`,
    /// `BlankText`, `MaxSentencesOutOfRange`. A request rejected by the size
    /// gate does not consume quota; one rejected by validation does.
    pub fn summarize(
        &self,
        client_id: &str,
        request: &SummarizeRequest,
    ) -> Result<Admitted<SummaryResult>, RequestError> {
        self.check_size(request.text.len())?;
        let remaining = self.admit(client_id)?;

        let length = request.text.chars().count();
        self.check_length(length)?;
        let text = request.text.trim();
        if text.is_empty() {
            return Err(RequestError::BlankText);
        }
        let max_sentences = self.resolve_max_sentences(request.max_sentences)?;

        let value = self.run(client_id, text, max_sentences);
        Ok(Admitted { value, remaining })
    }

    /// Summarize an uploaded file on behalf of `client_id`.
    ///
    /// Only `.txt` and `.md` files holding UTF-8 text are accepted.
    pub fn summarize_upload(
        &self,
        client_id: &str,
        filename: &str,
        bytes: &[u8],
        max_sentences: Option<usize>,
    ) -> Result<Admitted<SummaryResult>, RequestError> {
        self.check_size(bytes.len())?;
        let remaining = self.admit(client_id)?;

        if !UPLOAD_EXTENSIONS.iter().any(|ext| filename.ends_with(ext)) {
            return Err(RequestError::UnsupportedFileType {
                filename: filename.to_string(),
            });
        }
        let text = std::str::from_utf8(bytes).map_err(|_| RequestError::InvalidUtf8)?;

        let length = text.chars().count();
        if length > self.settings.max_content_length {
            return Err(RequestError::PayloadTooLarge {
                size: length,
                max_size: self.settings.max_content_length,
            });
        }
        self.check_length(length)?;
        let max_sentences = self.resolve_max_sentences(max_sentences)?;

        let value = self.run(client_id, text, max_sentences);
        Ok(Admitted { value, remaining })
    }

    /// Liveness report. Never subject to admission control.
    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "healthy".to_string(),
            version: self.settings.version.clone(),
            model_ready: true,
            requests_remaining: self.settings.rate_limit_requests,
        }
    }

    /// Name, version and routes of the service.
    pub fn info(&self) -> ServiceInfo {
        let endpoints = [
            ("health", "/health"),
            ("summarize", "/summarize"),
            ("upload", "/upload-summarize"),
            ("docs", "/docs"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), path.to_string()))
        .collect();

        ServiceInfo {
            message: self.settings.app_name.clone(),
            version: self.settings.version.clone(),
            endpoints,
        }
    }

    /// Settings the service was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The admission controller guarding this service.
    pub fn admission(&self) -> &AdmissionController<S> {
        &self.controller
    }

    /// The summarizer used for admitted requests.
    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    /// Admission metrics.
    pub fn metrics(&self) -> &Metrics {
        self.controller.metrics()
    }

    /// A sweeper that purges idle clients of this service.
    pub fn idle_sweeper(&self, config: SweeperConfig) -> IdleSweeper<S> {
        IdleSweeper::new(self.controller.clone(), config)
    }

    fn check_size(&self, size: usize) -> Result<(), RequestError> {
        let max_size = self.settings.max_content_length;
        if size > max_size {
            tracing::debug!(size, max_size, "request body too large");
            return Err(RequestError::PayloadTooLarge { size, max_size });
        }
        Ok(())
    }

    fn admit(&self, client_id: &str) -> Result<usize, RequestError> {
        let admission = self.controller.check(client_id);
        if admission.is_rejected() {
            return Err(RequestError::RateLimited {
                limit: self.settings.rate_limit_requests,
                window: self.settings.rate_limit_window,
                retry_after: admission.retry_after,
            });
        }
        Ok(admission.remaining)
    }

    fn check_length(&self, length: usize) -> Result<(), RequestError> {
        let (min, max) = (
            self.settings.min_content_length,
            self.settings.max_content_length,
        );
        if length < min || length > max {
            return Err(RequestError::InvalidLength { length, min, max });
        }
        Ok(())
    }

    fn resolve_max_sentences(&self, requested: Option<usize>) -> Result<usize, RequestError> {
        let requested = requested.unwrap_or(self.settings.default_max_sentences);
        let cap = self.settings.max_sentences_cap;
        if requested == 0 || requested > cap {
            return Err(RequestError::MaxSentencesOutOfRange { requested, cap });
        }
        Ok(requested)
    }

    fn run(&self, client_id: &str, text: &str, max_sentences: usize) -> SummaryResult {
        let result = self.summarizer.summarize(text, max_sentences);
        tracing::debug!(
            client = client_id,
            original_length = result.original_length,
            summary_length = result.summary_length,
            sentences = result.sentences_count,
            truncated = result.truncated,
            "document summarized"
        );
        result
    }
}

impl<S> std::fmt::Debug for SummaryService<S>
where
    S: Storage<String, RequestLog> + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryService")
            .field("settings", &self.settings)
            .field("admission", &self.controller)
            .finish_non_exhaustive()
    }
}
