//! Word segmentation backends.
//!
//! Scripts without whitespace word boundaries need a real segmenter to tell
//! whether a lexical unit was split across two OCR lines. The backend is a
//! construction-time choice: a dictionary lookup, a neural tagger behind a
//! socket, or anything else that can produce tokens.

use std::collections::HashSet;

/// External tokenizer capability: split text into word-level tokens.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Greedy longest-match segmentation over a fixed word list.
///
/// The fast dictionary-based backend: no model, deterministic, and accurate
/// enough for boundary-split detection where only "is this a known word"
/// matters. Characters not covered by any dictionary word become
/// single-character tokens.
pub struct DictionarySegmenter {
    words: HashSet<String>,
    max_word_chars: usize,
}

impl DictionarySegmenter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: HashSet<String> = words.into_iter().map(Into::into).collect();
        let max_word_chars = words.iter().map(|w| w.chars().count()).max().unwrap_or(1);
        Self {
            words,
            max_word_chars,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

impl Segmenter for DictionarySegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let max_len = self.max_word_chars.min(chars.len() - i);
            let mut matched = 1;
            // longest match wins
            for len in (2..=max_len).rev() {
                let candidate: String = chars[i..i + len].iter().collect();
                if self.words.contains(&candidate) {
                    matched = len;
                    break;
                }
            }
            tokens.push(chars[i..i + matched].iter().collect());
            i += matched;
        }

        tokens
    }
}

/// Trivial backend for space-delimited scripts.
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}
