mod pcm;
mod window;

pub use pcm::{f32_to_i16, i16_from_le_bytes};
pub use window::RollingWindow;

/// Sample rate expected by every downstream model.
pub const SAMPLE_RATE: u32 = 16000;

/// Width of one sample in the fixed PCM encoding (16-bit signed, mono).
pub const SAMPLE_WIDTH_BYTES: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("byte length {0} is not a whole number of 16-bit samples")]
    InvalidEncoding(usize),
    #[error("rolling window is empty")]
    EmptyBuffer,
    #[error("wav encoding failed: {0}")]
    EncodingFailed(String),
}

pub type Result<T> = std::result::Result<T, AudioError>;
