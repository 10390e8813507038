//! Voice-activity gating.
//!
//! A [`SpeechScorer`] wraps whatever VAD model the host application uses and
//! reduces a chunk of audio to one activation score in `[0, 1]`. The
//! [`VoiceActivityGate`] applies a fixed threshold to that score per chunk
//! and tells the caller whether to admit the chunk or treat it as an
//! utterance boundary.

#[derive(Debug, thiserror::Error)]
pub enum VadError {
    #[error("empty audio chunk")]
    EmptyChunk,
    #[error("inference error: {0}")]
    InferenceError(String),
}

pub type Result<T> = std::result::Result<T, VadError>;

/// External VAD capability: score one chunk of f32 mono audio.
///
/// Scores are normalized activations, not timestamps; `1.0` is certain
/// speech. Implementations may keep internal model state across chunks.
pub trait SpeechScorer: Send {
    fn score(&mut self, chunk: &[f32]) -> Result<f32>;
}

/// What the caller must do with the chunk it just offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Admit the chunk into the rolling window and run inference.
    Speech,
    /// Drop the chunk, clear the rolling window, and flush any accumulated
    /// transcript as a finalized utterance.
    Silence,
}

/// Gate configuration.
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Activation threshold; chunks scoring below it count as silence.
    pub threshold: f32,
    /// Number of consecutive sub-threshold chunks tolerated before the gate
    /// reports [`GateDecision::Silence`]. Zero clears on the first silent
    /// chunk; raising it trades boundary sharpness for resilience to short
    /// in-sentence pauses.
    pub hangover_chunks: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: 0.98,
            hangover_chunks: 0,
        }
    }
}

/// Per-chunk speech/silence admission gate.
pub struct VoiceActivityGate {
    scorer: Box<dyn SpeechScorer>,
    config: GateConfig,
    silent_run: u32,
}

impl VoiceActivityGate {
    pub fn new(scorer: Box<dyn SpeechScorer>) -> Self {
        Self::with_config(scorer, GateConfig::default())
    }

    pub fn with_config(scorer: Box<dyn SpeechScorer>, config: GateConfig) -> Self {
        Self {
            scorer,
            config,
            silent_run: 0,
        }
    }

    pub fn config(&self) -> GateConfig {
        self.config
    }

    /// Score one chunk and decide admission.
    ///
    /// Within a hangover run the chunk is still reported as [`GateDecision::Speech`]
    /// so a brief dip does not truncate the utterance.
    pub fn observe(&mut self, chunk: &[f32]) -> Result<GateDecision> {
        if chunk.is_empty() {
            return Err(VadError::EmptyChunk);
        }

        let score = self.scorer.score(chunk)?;
        if score >= self.config.threshold {
            self.silent_run = 0;
            return Ok(GateDecision::Speech);
        }

        self.silent_run = self.silent_run.saturating_add(1);
        if self.silent_run > self.config.hangover_chunks {
            tracing::debug!(score, run = self.silent_run, "silence boundary");
            self.silent_run = 0;
            Ok(GateDecision::Silence)
        } else {
            tracing::trace!(score, run = self.silent_run, "sub-threshold chunk within hangover");
            Ok(GateDecision::Speech)
        }
    }

    pub fn reset(&mut self) {
        self.silent_run = 0;
    }
}

/// RMS-energy scorer, peak-normalized so a full-scale chunk scores 1.0.
///
/// A dependency-free stand-in for a neural VAD; good enough for tests and
/// loopback audio with a known noise floor.
pub struct EnergyScorer {
    /// RMS at or above which the chunk scores 1.0.
    full_scale_rms: f32,
}

impl EnergyScorer {
    pub fn new(full_scale_rms: f32) -> Self {
        Self { full_scale_rms }
    }
}

impl Default for EnergyScorer {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl SpeechScorer for EnergyScorer {
    fn score(&mut self, chunk: &[f32]) -> Result<f32> {
        if chunk.is_empty() {
            return Err(VadError::EmptyChunk);
        }
        let mean_sq: f32 = chunk.iter().map(|s| s * s).sum::<f32>() / chunk.len() as f32;
        Ok((mean_sq.sqrt() / self.full_scale_rms).min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scorer that replays a fixed score sequence.
    struct ScriptedScorer {
        scores: Vec<f32>,
        pos: usize,
    }

    impl ScriptedScorer {
        fn new(scores: &[f32]) -> Box<Self> {
            Box::new(Self {
                scores: scores.to_vec(),
                pos: 0,
            })
        }
    }

    impl SpeechScorer for ScriptedScorer {
        fn score(&mut self, _chunk: &[f32]) -> Result<f32> {
            let s = self.scores[self.pos % self.scores.len()];
            self.pos += 1;
            Ok(s)
        }
    }

    #[test]
    fn speech_above_threshold() {
        let mut gate = VoiceActivityGate::new(ScriptedScorer::new(&[0.99]));
        assert_eq!(gate.observe(&[0.5]).unwrap(), GateDecision::Speech);
    }

    #[test]
    fn silence_below_threshold() {
        let mut gate = VoiceActivityGate::new(ScriptedScorer::new(&[0.1]));
        assert_eq!(gate.observe(&[0.0]).unwrap(), GateDecision::Silence);
    }

    #[test]
    fn empty_chunk_rejected() {
        let mut gate = VoiceActivityGate::new(ScriptedScorer::new(&[0.99]));
        assert!(matches!(gate.observe(&[]), Err(VadError::EmptyChunk)));
    }

    #[test]
    fn hangover_tolerates_short_dips() {
        let config = GateConfig {
            threshold: 0.98,
            hangover_chunks: 2,
        };
        let mut gate = VoiceActivityGate::with_config(
            ScriptedScorer::new(&[0.99, 0.1, 0.1, 0.99, 0.1, 0.1, 0.1]),
            config,
        );

        let chunk = [0.0f32; 4];
        assert_eq!(gate.observe(&chunk).unwrap(), GateDecision::Speech);
        // Two sub-threshold chunks stay inside the hangover
        assert_eq!(gate.observe(&chunk).unwrap(), GateDecision::Speech);
        assert_eq!(gate.observe(&chunk).unwrap(), GateDecision::Speech);
        // Speech resumes and resets the run
        assert_eq!(gate.observe(&chunk).unwrap(), GateDecision::Speech);
        // Three in a row exceeds the hangover
        assert_eq!(gate.observe(&chunk).unwrap(), GateDecision::Speech);
        assert_eq!(gate.observe(&chunk).unwrap(), GateDecision::Speech);
        assert_eq!(gate.observe(&chunk).unwrap(), GateDecision::Silence);
    }

    #[test]
    fn energy_scorer_scales_with_amplitude() {
        let mut scorer = EnergyScorer::new(0.5);
        let quiet = scorer.score(&[0.01, -0.01, 0.01, -0.01]).unwrap();
        let loud = scorer.score(&[0.5, -0.5, 0.5, -0.5]).unwrap();
        assert!(quiet < 0.1);
        assert!((loud - 1.0).abs() < 1e-6);
    }
}
