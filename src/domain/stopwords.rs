//! Stop-word filtering.
//!
//! The default English list comes from the `stop-words` crate. Deployments
//! that need a different corpus can build a filter from their own list; the
//! summarizer only requires that membership stays fixed for its lifetime.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

/// A closed set of lowercase function words excluded from frequency scoring.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: FxHashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::english()
    }
}

impl StopwordFilter {
    /// The English stop-word list.
    pub fn english() -> Self {
        Self {
            stopwords: get(LANGUAGE::English)
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
        }
    }

    /// A filter that treats no word as a stop word.
    pub fn empty() -> Self {
        Self {
            stopwords: FxHashSet::default(),
        }
    }

    /// Build a filter from a custom list. Entries are lowercased.
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Add words to the filter.
    pub fn add_stopwords(&mut self, words: &[&str]) {
        self.stopwords
            .extend(words.iter().map(|w| w.to_lowercase()));
    }

    /// Check whether a token is a stop word.
    ///
    /// Tokens produced by [`tokenize`](crate::domain::text::tokenize) are
    /// already lowercase, so this is a plain set lookup.
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Number of words in the filter.
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Whether the filter is empty.
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
