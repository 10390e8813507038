//! Grouping ordered fragments into paragraphs.

use crate::fragment::{Paragraph, TextFragment};
use crate::score::ContinuationScorer;
use crate::{GroupError, Result};

/// Default continuation-score threshold for merging.
pub const DEFAULT_THRESHOLD: f32 = 0.2;

/// Merges contiguous fragments whose continuation score clears a threshold.
pub struct SegmentGrouper {
    scorer: ContinuationScorer,
    threshold: f32,
}

impl SegmentGrouper {
    pub fn new(scorer: ContinuationScorer) -> Self {
        Self {
            scorer,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Group an ordered fragment sequence into paragraphs.
    ///
    /// Adjacent fragments merge when their continuation score reaches the
    /// threshold; text is concatenated without separators (scripts without
    /// whitespace word boundaries) and regions are unioned. The last open
    /// paragraph is always closed, so non-empty input yields between 1 and
    /// `fragments.len()` paragraphs and never drops a character.
    ///
    /// Fails with [`GroupError::EmptyInput`] on zero fragments; callers must
    /// special-case that instead of relying on an undefined start state.
    pub fn group(&self, fragments: &[TextFragment]) -> Result<Vec<Paragraph>> {
        let first = fragments.first().ok_or(GroupError::EmptyInput)?;

        let mut paragraphs = Vec::new();
        let mut current = Paragraph {
            text: first.text.clone(),
            bbox: first.bbox,
        };

        for pair in fragments.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let score = self.scorer.score(&prev.text, &next.text);
            tracing::trace!(score, prev = %prev.text, next = %next.text, "continuation score");

            if score >= self.threshold {
                current.text.push_str(&next.text);
                current.bbox = current.bbox.union(&next.bbox);
            } else {
                paragraphs.push(std::mem::replace(
                    &mut current,
                    Paragraph {
                        text: next.text.clone(),
                        bbox: next.bbox,
                    },
                ));
            }
        }

        paragraphs.push(current);
        Ok(paragraphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::BoundingBox;
    use crate::segment::DictionarySegmenter;

    fn frag(text: &str, bbox: [i32; 4]) -> TextFragment {
        TextFragment::new(text, BoundingBox::from(bbox), 0.9)
    }

    fn grouper(words: &[&str]) -> SegmentGrouper {
        SegmentGrouper::new(ContinuationScorer::new(Box::new(DictionarySegmenter::new(
            words.iter().copied(),
        ))))
    }

    #[test]
    fn empty_input_is_rejected() {
        let g = grouper(&[]);
        assert!(matches!(g.group(&[]), Err(GroupError::EmptyInput)));
    }

    #[test]
    fn single_fragment_is_single_paragraph() {
        let g = grouper(&[]);
        let out = g.group(&[frag("独行", [0, 0, 5, 5])]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "独行");
    }

    #[test]
    fn sentence_continuation_merges_cue_splits() {
        // The first two fragments continue one sentence; 首先 opens a new
        // paragraph.
        let g = grouper(&["今天", "天气", "很好", "首先", "我们"]);
        let out = g
            .group(&[
                frag("今天天气", [0, 0, 10, 10]),
                frag("很好。", [10, 0, 20, 10]),
                frag("首先我们", [0, 10, 10, 20]),
            ])
            .unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "今天天气很好。");
        assert_eq!(out[0].bbox, BoundingBox::new(0, 0, 20, 10));
        assert_eq!(out[1].text, "首先我们");
        assert_eq!(out[1].bbox, BoundingBox::new(0, 10, 10, 20));
    }

    #[test]
    fn split_word_joins_fragments() {
        let g = grouper(&["问题", "我们"]);
        let out = g
            .group(&[
                frag("这是一个问", [0, 0, 10, 10]),
                frag("题，我们必须", [0, 10, 10, 20]),
            ])
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "这是一个问题，我们必须");
    }

    #[test]
    fn grouping_conserves_characters() {
        let fragments = vec![
            frag("今天天气", [0, 0, 10, 10]),
            frag("很好。", [10, 0, 20, 10]),
            frag("首先我们", [0, 10, 10, 20]),
            frag("出发，", [0, 20, 10, 30]),
            frag("然而天黑了", [0, 30, 10, 40]),
        ];
        let joined: String = fragments.iter().map(|f| f.text.as_str()).collect();

        for threshold in [-10.0, -0.5, 0.0, 0.2, 0.5, 10.0] {
            let g = grouper(&["今天", "天气"]).with_threshold(threshold);
            let out = g.group(&fragments).unwrap();

            let regrouped: String = out.iter().map(|p| p.text.as_str()).collect();
            assert_eq!(regrouped, joined, "threshold {threshold} dropped characters");
            assert!(!out.is_empty() && out.len() <= fragments.len());
        }
    }

    #[test]
    fn extreme_thresholds_bound_paragraph_count() {
        let fragments = vec![
            frag("一", [0, 0, 1, 1]),
            frag("二", [1, 0, 2, 1]),
            frag("三", [2, 0, 3, 1]),
        ];

        let merge_all = grouper(&[]).with_threshold(f32::NEG_INFINITY);
        assert_eq!(merge_all.group(&fragments).unwrap().len(), 1);

        let split_all = grouper(&[]).with_threshold(f32::INFINITY);
        assert_eq!(split_all.group(&fragments).unwrap().len(), 3);
    }
}
