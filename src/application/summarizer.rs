//! Frequency-based extractive summarization.
//!
//! Sentences are scored by the average normalized frequency of their words
//! and the best ones are returned in document order.

use crate::domain::{
    frequency::WordFrequencyTable,
    stopwords::StopwordFilter,
    summary::SummaryResult,
    text::{normalize_whitespace, split_sentences, Sentence},
};

/// Extractive summarizer.
///
/// Holds only the immutable stop-word set, so one instance can be shared
/// freely across threads.
///
/// # Example
/// ```
/// use textdigest::Summarizer;
///
/// let summarizer = Summarizer::default();
/// let text = "Rust is fast. Rust is safe. Cats sleep a lot. Rust has great tooling.";
/// let result = summarizer.summarize(text, 2);
///
/// assert!(result.truncated);
/// assert_eq!(result.sentences_count, 2);
/// assert!(!result.summary.contains("Cats"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Summarizer {
    stopwords: StopwordFilter,
}

impl Summarizer {
    /// Create a summarizer that ignores the given stop words when counting.
    pub fn new(stopwords: StopwordFilter) -> Self {
        Self { stopwords }
    }

    /// The stop words ignored by this summarizer.
    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    /// Reduce `text` to at most `max_sentences` of its highest-scoring sentences.
    ///
    /// A `max_sentences` of zero is treated as one. When the document already
    /// fits, the whole normalized text is returned untouched and nothing is
    /// scored. Sentences without a single alphanumeric token are never
    /// selected. Ties in score go to the earlier sentence.
    pub fn summarize(&self, text: &str, max_sentences: usize) -> SummaryResult {
        let max_sentences = max_sentences.max(1);
        let original_length = text.chars().count();
        let cleaned = normalize_whitespace(text);
        let sentences = split_sentences(&cleaned);

        if sentences.len() <= max_sentences {
            let count = sentences.len();
            return SummaryResult::new(cleaned, original_length, count, false);
        }

        let selected = self.select(&sentences, max_sentences);
        let summary = selected
            .iter()
            .map(|sentence| sentence.text)
            .collect::<Vec<_>>()
            .join(" ");

        SummaryResult::new(summary, original_length, selected.len(), true)
    }

    /// Pick the top sentences and return them in document order.
    fn select<'a>(&self, sentences: &[Sentence<'a>], max_sentences: usize) -> Vec<Sentence<'a>> {
        let table = WordFrequencyTable::build(sentences, &self.stopwords);

        let mut ranked: Vec<(Sentence<'a>, f64)> = sentences
            .iter()
            .filter_map(|sentence| table.score(sentence).map(|score| (*sentence, score)))
            .collect();
        ranked.sort_by(|(a, a_score), (b, b_score)| {
            b_score.total_cmp(a_score).then(a.index.cmp(&b.index))
        });
        ranked.truncate(max_sentences);

        let mut selected: Vec<Sentence<'a>> = ranked.into_iter().map(|(s, _)| s).collect();
        selected.sort_by_key(|sentence| sentence.index);
        selected
    }
}
