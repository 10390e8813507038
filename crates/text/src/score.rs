//! Continuation scoring between adjacent text fragments.
//!
//! Four independent heuristics vote on whether two fragments belong to the
//! same paragraph: trailing punctuation, a lexical unit split across the
//! boundary, fingerprint similarity, and discourse markers that open a new
//! paragraph. The score is a pure function of the two strings.

use crate::segment::Segmenter;
use crate::simhash::{similarity, simhash64};

/// Punctuation that strongly indicates the clause continues.
const MID_CLAUSE: &[char] = &[
    '，', '、', '：', '；', '（', '《', '“', '‘', ',', ':', ';', '(', '[', '{',
];

/// Punctuation that terminates a sentence.
const END_CLAUSE: &[char] = &['。', '！', '？', '.', '!', '?'];

/// Discourse markers that open a new paragraph regardless of other signals.
const DEFAULT_CUES: &[&str] = &[
    "首先",
    "其次",
    "然而",
    "此外",
    "另外",
    "总结来说",
    "综上所述",
    "总之",
    "对于",
    "关于",
];

/// Characters taken from each side of the boundary for split-word detection.
const BOUNDARY_CHARS: usize = 3;

/// Signal weights; the cue weight is subtracted.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub punctuation: f32,
    pub boundary: f32,
    pub similarity: f32,
    pub cue: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            punctuation: 0.5,
            boundary: 0.7,
            similarity: 0.4,
            cue: 1.0,
        }
    }
}

pub struct ContinuationScorer {
    segmenter: Box<dyn Segmenter>,
    weights: ScoreWeights,
    cues: Vec<String>,
}

impl ContinuationScorer {
    pub fn new(segmenter: Box<dyn Segmenter>) -> Self {
        Self {
            segmenter,
            weights: ScoreWeights::default(),
            cues: DEFAULT_CUES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the paragraph-start cue list, e.g. to localize it.
    pub fn with_cues<I, S>(mut self, cues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cues = cues.into_iter().map(Into::into).collect();
        self
    }

    /// Should-merge score for two adjacent fragments. Higher means `l2` is
    /// more likely a continuation of `l1`.
    pub fn score(&self, l1: &str, l2: &str) -> f32 {
        let w = &self.weights;
        let cue = if self.starts_with_cue(l2) { w.cue } else { 0.0 };
        w.punctuation * punctuation_signal(l1) + w.boundary * self.boundary_signal(l1, l2)
            - cue
            + w.similarity * similarity_signal(l1, l2)
    }

    fn starts_with_cue(&self, line: &str) -> bool {
        self.cues.iter().any(|c| line.starts_with(c.as_str()))
    }

    /// Detect a lexical unit split across the line boundary.
    ///
    /// Example: L1 `这是一个问`, L2 `题，我们必须` — the word 问题 only
    /// exists once the lines are joined, so L2 continues L1.
    fn boundary_signal(&self, l1: &str, l2: &str) -> f32 {
        if l1.is_empty() || l2.is_empty() {
            return 0.0;
        }

        let tail: String = {
            let chars: Vec<char> = l1.chars().collect();
            chars[chars.len().saturating_sub(BOUNDARY_CHARS)..]
                .iter()
                .collect()
        };
        let head: String = l2.chars().take(BOUNDARY_CHARS).collect();
        let window = format!("{tail}{head}");

        let mut count = 0.0f32;
        for token in self.segmenter.segment(&window) {
            if token.chars().count() >= 2 && !l1.contains(&token) && !l2.contains(&token) {
                count += 1.0;
            }
        }
        count.min(1.0)
    }
}

fn punctuation_signal(line: &str) -> f32 {
    match line.chars().last() {
        Some(c) if MID_CLAUSE.contains(&c) => 1.0,
        Some(c) if END_CLAUSE.contains(&c) => -0.5,
        _ => 0.0,
    }
}

fn similarity_signal(l1: &str, l2: &str) -> f32 {
    if l1.is_empty() || l2.is_empty() {
        return 0.0;
    }
    similarity(simhash64(l1), simhash64(l2))
}
