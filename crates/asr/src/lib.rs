mod diff;
mod engine;
mod transcriber;

pub use diff::{align, TranscriptDelta};
pub use engine::Transcriber;
pub use transcriber::{ChunkOutcome, IncrementalTranscriber, TranscriptState};

#[derive(Debug, thiserror::Error)]
pub enum AsrError {
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error(transparent)]
    Audio(#[from] livecap_audio::AudioError),
    #[error(transparent)]
    Vad(#[from] livecap_vad::VadError),
}

pub type Result<T> = std::result::Result<T, AsrError>;
