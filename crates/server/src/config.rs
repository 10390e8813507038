//! Session configuration.

use livecap_asr::IncrementalTranscriber;
use livecap_audio::RollingWindow;
use livecap_vad::{GateConfig, SpeechScorer, VoiceActivityGate};
use serde::{Deserialize, Serialize};

/// OCR session tunables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Detections scoring below this are dropped before grouping.
    pub min_confidence: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            min_confidence: livecap_ocr::DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// Audio session tunables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    /// Fixed rolling-window length; inference cost scales with it, since
    /// every step re-transcribes the whole window.
    pub context_seconds: f32,
    /// Length of one admission step, and therefore the inference cadence.
    pub step_seconds: f32,
    /// VAD activation threshold.
    pub vad_threshold: f32,
    /// Sub-threshold steps tolerated before a silence boundary is declared.
    pub hangover_chunks: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: livecap_audio::SAMPLE_RATE,
            context_seconds: 15.0,
            step_seconds: 1.0,
            vad_threshold: 0.98,
            hangover_chunks: 0,
        }
    }
}

impl AudioConfig {
    /// Samples per admission step.
    pub fn chunk_samples(&self) -> usize {
        (self.step_seconds * self.sample_rate as f32) as usize
    }

    /// Assemble a transcriber around the given VAD scorer.
    pub fn build_transcriber(&self, scorer: Box<dyn SpeechScorer>) -> IncrementalTranscriber {
        let window = RollingWindow::new(self.context_seconds, self.sample_rate);
        let gate = VoiceActivityGate::with_config(
            scorer,
            GateConfig {
                threshold: self.vad_threshold,
                hangover_chunks: self.hangover_chunks,
            },
        );
        IncrementalTranscriber::new(window, gate)
    }
}
