//! Word frequency table used to weight sentences.

use crate::domain::stopwords::StopwordFilter;
use crate::domain::text::Sentence;
use rustc_hash::FxHashMap;

/// Normalized frequency of every non-stop-word token in a document.
///
/// Weights are `count / max_count`, so the most frequent token weighs `1.0`.
/// Stop words never enter the table; looking one up yields `None`.
#[derive(Debug, Clone, Default)]
pub struct WordFrequencyTable {
    weights: FxHashMap<String, f64>,
    max_count: usize,
}

impl WordFrequencyTable {
    /// Count the tokens of all sentences, skipping stop words.
    pub fn build(sentences: &[Sentence<'_>], stopwords: &StopwordFilter) -> Self {
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();
        for sentence in sentences {
            for token in sentence.tokens() {
                if !stopwords.is_stopword(&token) {
                    *counts.entry(token).or_insert(0) += 1;
                }
            }
        }

        // An empty table keeps a divisor of one.
        let max_count = counts.values().copied().max().unwrap_or(1);
        let weights = counts
            .into_iter()
            .map(|(token, count)| (token, count as f64 / max_count as f64))
            .collect();

        Self { weights, max_count }
    }

    /// Normalized weight of a token, if it was counted.
    pub fn weight(&self, token: &str) -> Option<f64> {
        self.weights.get(token).copied()
    }

    /// Highest raw count observed (1 for an empty table).
    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether no token was counted.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Average weight per alphanumeric token of a sentence.
    ///
    /// Tokens missing from the table contribute zero. Returns `None` when the
    /// sentence has no alphanumeric token at all.
    pub fn score(&self, sentence: &Sentence<'_>) -> Option<f64> {
        let mut total = 0.0;
        let mut tokens = 0usize;
        for token in sentence.tokens() {
            tokens += 1;
            total += self.weight(&token).unwrap_or(0.0);
        }
        (tokens > 0).then(|| total / tokens as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::text::split_sentences;

    #[test]
    fn test_weights_are_normalized_by_max() {
        let sentences = split_sentences("Rust rust rust. Cargo cargo. Crate.");
        let table = WordFrequencyTable::build(&sentences, &StopwordFilter::empty());

        assert_eq!(table.max_count(), 3);
        assert_eq!(table.len(), 3);
        assert_eq!(table.weight("rust"), Some(1.0));
        assert!((table.weight("cargo").unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((table.weight("crate").unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_stopwords_are_excluded() {
        let stopwords = StopwordFilter::from_list(&["the"]);
        let sentences = split_sentences("The the the cat. The cat sat.");
        let table = WordFrequencyTable::build(&sentences, &stopwords);

        assert_eq!(table.weight("the"), None);
        assert_eq!(table.max_count(), 2);
        assert_eq!(table.weight("cat"), Some(1.0));
        assert_eq!(table.weight("sat"), Some(0.5));
    }

    #[test]
    fn test_empty_table_uses_unit_divisor() {
        let stopwords = StopwordFilter::from_list(&["a", "the"]);
        let sentences = split_sentences("A the. The a.");
        let table = WordFrequencyTable::build(&sentences, &stopwords);

        assert!(table.is_empty());
        assert_eq!(table.max_count(), 1);
        assert_eq!(table.score(&sentences[0]), Some(0.0));
    }

    #[test]
    fn test_score_averages_over_all_tokens() {
        let stopwords = StopwordFilter::from_list(&["the"]);
        let sentences = split_sentences("The cat. Cat cat.");
        let table = WordFrequencyTable::build(&sentences, &stopwords);

        // "the" contributes 0 but still counts toward the denominator.
        assert_eq!(table.score(&sentences[0]), Some(0.5));
        assert_eq!(table.score(&sentences[1]), Some(1.0));
    }

    #[test]
    fn test_sentence_without_tokens_has_no_score() {
        let sentences = split_sentences("Words here. ?!");
        let table = WordFrequencyTable::build(&sentences, &StopwordFilter::empty());

        assert_eq!(sentences.len(), 2);
        assert_eq!(table.score(&sentences[1]), None);
    }
}
