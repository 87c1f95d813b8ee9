//! Text normalization, sentence segmentation and word tokenization.
//!
//! Everything here operates on borrowed slices of the normalized document so
//! a summarization pass allocates the cleaned text once and nothing per
//! sentence.

/// Abbreviations whose trailing period does not end a sentence.
///
/// Matched case-insensitively against the word preceding the period, with
/// internal periods kept (`e.g`, `u.s`).
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "rev", "hon", "gen", "col", "lt",
    "sgt", "capt", "gov", "sen", "rep", "vs", "etc", "e.g", "i.e", "cf", "approx", "dept", "inc",
    "ltd", "corp", "bros", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct",
    "nov", "dec", "a.m", "p.m", "u.s", "u.k", "ph.d",
];

/// Abbreviations that only hold when a number follows (`No. 5`, `pp. 12`).
const NUMBERED_ABBREVIATIONS: &[&str] = &["no", "nos", "vol", "fig", "pp", "ch", "art"];

/// Characters that may trail a terminator and still belong to the sentence.
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}'];

/// A sentence borrowed from the normalized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    /// Position of the sentence in the document (0-based).
    pub index: usize,
    /// Sentence text, without surrounding whitespace.
    pub text: &'a str,
}

impl<'a> Sentence<'a> {
    /// Lowercased alphanumeric tokens of this sentence.
    pub fn tokens(&self) -> impl Iterator<Item = String> + 'a {
        tokenize(self.text)
    }
}

/// Collapse every run of whitespace to a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Split normalized text into sentences.
///
/// A sentence ends after a run of `.`, `!` or `?` (plus any closing quotes or
/// brackets) that is followed by whitespace or the end of the text. A single
/// `.` after a known abbreviation or a name initial does not end a sentence.
/// Text without a terminator is returned as one sentence; empty text yields
/// none.
pub fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }

        let mut end = pos + c.len_utf8();
        let mut only_period = c == '.';
        while let Some(&(next_pos, next)) = chars.peek() {
            if is_terminator(next) || CLOSERS.contains(&next) {
                only_period &= next != '!' && next != '?' && next != '.';
                end = next_pos + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        let at_boundary = match chars.peek() {
            None => true,
            Some(&(_, next)) => next.is_whitespace(),
        };
        if !at_boundary {
            continue;
        }
        if only_period && ends_with_abbreviation(&text[start..pos], &text[end..]) {
            continue;
        }

        push_sentence(&mut sentences, &text[start..end]);
        start = end;
    }

    if start < text.len() {
        push_sentence(&mut sentences, &text[start..]);
    }

    sentences
}

/// Lowercased alphanumeric tokens of `text`.
///
/// Any non-alphanumeric character separates tokens, so `"don't"` yields
/// `don` and `t`.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn push_sentence<'a>(sentences: &mut Vec<Sentence<'a>>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(Sentence {
            index: sentences.len(),
            text: trimmed,
        });
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Whether the period between `before` and `after` closes an abbreviation
/// or a name initial rather than the sentence.
fn ends_with_abbreviation(before: &str, after: &str) -> bool {
    let mut words = before
        .split_whitespace()
        .rev()
        .map(|w| w.trim_start_matches(|c: char| !c.is_alphanumeric()));
    let Some(word) = words.next() else {
        return false;
    };
    let next = after.split_whitespace().next().unwrap_or_default();

    let mut letters = word.chars();
    if let (Some(letter), None) = (letters.next(), letters.next()) {
        return is_initial(letter, words.next(), next);
    }

    let lowered = word.to_lowercase();
    if NUMBERED_ABBREVIATIONS.contains(&lowered.as_str()) {
        return next.starts_with(|c: char| c.is_ascii_digit());
    }
    ABBREVIATIONS.contains(&lowered.as_str())
}

/// An uppercase letter other than `I`, opening the sentence or following a
/// capitalized word, with a capitalized word after it (`J. R. R. Tolkien`,
/// `John F. Kennedy`).
fn is_initial(letter: char, previous: Option<&str>, next: &str) -> bool {
    let capitalized = |w: &str| w.starts_with(char::is_uppercase);
    letter.is_uppercase()
        && letter != 'I'
        && previous.map_or(true, capitalized)
        && capitalized(next)
}
