//! Leading-sentence summarizer.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_MAX_SENTENCES: usize = 3;

/// Sentence-terminating punctuation followed by whitespace.
static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+\s+").unwrap());

/// Split text into sentences. Terminators stay with their sentence; the
/// whitespace after them is dropped.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        let end = m.start() + m.as_str().trim_end().len();
        out.push(&text[start..end]);
        start = m.end();
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// The first `max_sentences` sentences joined by single spaces.
pub fn summarize(text: &str, max_sentences: usize) -> String {
    sentences(text)
        .into_iter()
        .take(max_sentences)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
