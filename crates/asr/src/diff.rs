//! Transcript diffing for the take-back-and-extend protocol.
//!
//! Re-transcribing a shifting audio window is not append-only: the model may
//! revise earlier words once more context arrives. Each new full transcript
//! is aligned against the previous one by longest common substring; the sink
//! retracts `revise` trailing characters, then appends `append`.

/// One step of the take-back-and-extend protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDelta {
    /// Trailing characters of the previously emitted text to retract.
    pub revise: usize,
    /// Text to append after retraction.
    pub append: String,
}

impl TranscriptDelta {
    pub fn is_empty(&self) -> bool {
        self.revise == 0 && self.append.is_empty()
    }
}

/// Align `new` against `prev` and produce the delta the sink must apply.
///
/// `revise` is `prev` length minus the match length (in Unicode scalar
/// values, saturating at zero); `append` is `new` with the matched span cut
/// out, prefix and suffix concatenated.
pub fn align(prev: &str, new: &str) -> TranscriptDelta {
    let prev_chars: Vec<char> = prev.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();

    let (match_len, new_start) = longest_common_substring(&prev_chars, &new_chars);

    let mut append = String::new();
    append.extend(&new_chars[..new_start]);
    append.extend(&new_chars[new_start + match_len..]);

    TranscriptDelta {
        revise: prev_chars.len().saturating_sub(match_len),
        append,
    }
}

/// Longest common contiguous substring; returns `(length, start_in_b)`.
///
/// Classic O(n*m) dynamic program with a rolling row. Transcripts are
/// bounded by the rolling window's context length, so quadratic cost is
/// fine here.
fn longest_common_substring(a: &[char], b: &[char]) -> (usize, usize) {
    if a.is_empty() || b.is_empty() {
        return (0, 0);
    }

    let mut prev_row = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    let mut best_len = 0usize;
    let mut best_end_b = 0usize;

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb { prev_row[j] + 1 } else { 0 };
            if row[j + 1] > best_len {
                best_len = row[j + 1];
                best_end_b = j + 1;
            }
        }
        std::mem::swap(&mut prev_row, &mut row);
    }

    (best_len, best_end_b - best_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_append_retracts_nothing() {
        let d = align("今天天气", "今天天气很好");
        assert_eq!(d.revise, 0);
        assert_eq!(d.append, "很好");
    }

    #[test]
    fn identical_text_is_empty_delta() {
        let d = align("hello world", "hello world");
        assert!(d.is_empty());
    }

    #[test]
    fn full_replacement_retracts_everything() {
        let d = align("abc", "xyz");
        assert_eq!(d.revise, 3);
        assert_eq!(d.append, "xyz");
    }

    #[test]
    fn empty_prev_emits_whole_text() {
        let d = align("", "你好");
        assert_eq!(d.revise, 0);
        assert_eq!(d.append, "你好");
    }

    #[test]
    fn empty_new_retracts_whole_prev() {
        let d = align("你好", "");
        assert_eq!(d.revise, 2);
        assert_eq!(d.append, "");
    }

    #[test]
    fn mid_revision_keeps_common_span() {
        // Model revised the first word and extended the tail
        let prev = "今天添气很";
        let new = "今天天气很好";
        let d = align(prev, new);
        // Longest common run found first is "今天" (length 2): retract 3 of 5,
        // re-emit everything after the match
        assert_eq!(d.revise, 3);
        assert_eq!(d.append, "天气很好");
    }

    #[test]
    fn revise_counts_chars_not_bytes() {
        let d = align("日本語テスト", "完全に別の物");
        assert_eq!(d.revise, 6);
    }

    #[test]
    fn deterministic_across_calls() {
        let a = align("the quick brown fox", "the quick brown foxes");
        let b = align("the quick brown fox", "the quick brown foxes");
        assert_eq!(a, b);
    }
}
