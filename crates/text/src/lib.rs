//! Text reconstruction: merging fragmented OCR/ASR lines into paragraphs.

mod fragment;
mod group;
mod score;
mod segment;
mod simhash;

pub use fragment::{BoundingBox, Paragraph, TextFragment};
pub use group::{SegmentGrouper, DEFAULT_THRESHOLD};
pub use score::{ContinuationScorer, ScoreWeights};
pub use segment::{DictionarySegmenter, Segmenter, WhitespaceSegmenter};
pub use simhash::{similarity, simhash64};

#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error("cannot group an empty fragment sequence")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, GroupError>;
