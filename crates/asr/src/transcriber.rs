//! Incremental transcription over a rolling audio window.
//!
//! Every admitted chunk lands in the window; every inference step
//! re-transcribes the whole window and diffs against the previous full
//! transcript. Compute therefore scales with the window's context length,
//! a deliberate trade of efficiency for hypothesis stability.

use livecap_audio::{f32_to_i16, RollingWindow};
use livecap_vad::{GateDecision, VoiceActivityGate};

use crate::diff::{align, TranscriptDelta};
use crate::engine::Transcriber;
use crate::Result;

/// Finalized vs. still-revisable portions of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranscriptState {
    /// Concatenation of all flushed utterances; never shrinks.
    pub stable: String,
    /// Current full-window hypothesis, replaced wholesale on each diff step.
    pub volatile: String,
}

/// Result of offering one audio chunk to the admission gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// Chunk admitted into the window; run an inference step next.
    Admitted,
    /// Chunk was silence: the window was cleared, and if a hypothesis had
    /// accumulated it is returned here as a finalized utterance.
    Silence { flushed: Option<String> },
}

/// Drives one audio session: rolling window, VAD gate, and the external
/// transcription engine.
///
/// The session is a two-state machine: idle (empty window, empty volatile
/// text) and accumulating. Silence moves it back to idle and finalizes the
/// hypothesis. All methods take `&mut self`, so inference steps cannot
/// interleave within a session; the previous/new diff baseline stays
/// coherent by construction.
pub struct IncrementalTranscriber {
    window: RollingWindow,
    gate: VoiceActivityGate,
    prev_text: String,
    utterances: Vec<String>,
}

impl IncrementalTranscriber {
    pub fn new(window: RollingWindow, gate: VoiceActivityGate) -> Self {
        Self {
            window,
            gate,
            prev_text: String::new(),
            utterances: Vec::new(),
        }
    }

    /// Offer one f32 chunk to the gate.
    ///
    /// Speech chunks are converted to 16-bit PCM and appended to the window.
    /// Silence clears the window (stale context would corrupt the next
    /// inference) and flushes the accumulated hypothesis, producing a hard
    /// utterance boundary.
    pub fn push_chunk(&mut self, chunk: &[f32]) -> Result<ChunkOutcome> {
        match self.gate.observe(chunk)? {
            GateDecision::Speech => {
                self.window.append(&f32_to_i16(chunk));
                Ok(ChunkOutcome::Admitted)
            }
            GateDecision::Silence => {
                self.window.clear();
                Ok(ChunkOutcome::Silence {
                    flushed: self.flush(),
                })
            }
        }
    }

    /// Run one inference step over the entire current window.
    ///
    /// Returns `Ok(None)` when the window is empty or the new transcript is
    /// identical to the previous one. On engine failure the window and the
    /// diff baseline are left untouched, so the next step retries from the
    /// same state.
    pub fn infer_once(&mut self, engine: &dyn Transcriber) -> Result<Option<TranscriptDelta>> {
        let Some(wav) = self.wav_snapshot()? else {
            return Ok(None);
        };
        let new_text = engine.transcribe(&wav)?;
        Ok(self.apply_transcript(new_text))
    }

    /// WAV serialization of the current window, or `None` when idle.
    ///
    /// Lets async callers take the snapshot, run the blocking engine call on
    /// a worker pool, and feed the result back through
    /// [`apply_transcript`](Self::apply_transcript) without borrowing the
    /// session state across the call.
    pub fn wav_snapshot(&self) -> Result<Option<Vec<u8>>> {
        if self.window.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.window.to_wav_bytes()?))
    }

    /// Advance the diff baseline with a full-window hypothesis.
    ///
    /// Returns the delta the sink must apply, or `None` when the hypothesis
    /// is unchanged.
    pub fn apply_transcript(&mut self, new_text: String) -> Option<TranscriptDelta> {
        let delta = align(&self.prev_text, &new_text);
        tracing::debug!(
            window_secs = self.window.duration_secs(),
            revise = delta.revise,
            append = %delta.append,
            "inference step"
        );
        self.prev_text = new_text;

        if delta.is_empty() {
            None
        } else {
            Some(delta)
        }
    }

    /// Finalize the current hypothesis, moving it from volatile to stable.
    ///
    /// Returns the flushed utterance, or `None` if nothing had accumulated.
    pub fn flush(&mut self) -> Option<String> {
        if self.prev_text.is_empty() {
            return None;
        }
        let utterance = std::mem::take(&mut self.prev_text);
        tracing::debug!(utterance = %utterance, "utterance finalized");
        self.utterances.push(utterance.clone());
        Some(utterance)
    }

    /// Snapshot of the stable/volatile split.
    pub fn state(&self) -> TranscriptState {
        TranscriptState {
            stable: self.utterances.concat(),
            volatile: self.prev_text.clone(),
        }
    }

    pub fn utterances(&self) -> &[String] {
        &self.utterances
    }

    pub fn is_idle(&self) -> bool {
        self.window.is_empty() && self.prev_text.is_empty()
    }
}
