//! Summary result returned to callers.

use serde::{Deserialize, Serialize};

/// Outcome of one summarization call.
///
/// Lengths are counted in characters, not bytes. `original_length` measures
/// the raw input before whitespace normalization, `summary_length` the
/// produced summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Selected sentences joined by single spaces, in document order.
    pub summary: String,
    /// Character count of the raw input.
    pub original_length: usize,
    /// Character count of `summary`.
    pub summary_length: usize,
    /// Number of sentences in `summary`.
    pub sentences_count: usize,
    /// Whether the document had more sentences than requested.
    pub truncated: bool,
}

impl SummaryResult {
    pub(crate) fn new(
        summary: String,
        original_length: usize,
        sentences_count: usize,
        truncated: bool,
    ) -> Self {
        Self {
            summary_length: summary.chars().count(),
            summary,
            original_length,
            sentences_count,
            truncated,
        }
    }

    /// Summary length as a fraction of the original length.
    ///
    /// Returns 0.0 for an empty original.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_length == 0 {
            0.0
        } else {
            self.summary_length as f64 / self.original_length as f64
        }
    }
}
