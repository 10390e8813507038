//! Session orchestration: socket-fed OCR sessions and channel-fed audio
//! sessions over the reconstruction core.

pub mod audio;
pub mod codec;
pub mod config;
pub mod ocr;

pub use audio::{AudioSession, TranscriptEvent};
pub use codec::{FrameHeader, FrameResponse};
pub use config::{AudioConfig, OcrConfig};
pub use ocr::OcrServer;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Peer closed or short read/write. Fatal to the current session only;
    /// the accept loop keeps serving new connections.
    #[error("connection lost")]
    ConnectionLost,
    /// Header inconsistent with its own declared dimensions. The unit is
    /// rejected, the session stays alive.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
    #[error(transparent)]
    Ocr(#[from] livecap_ocr::OcrError),
    #[error(transparent)]
    Group(#[from] livecap_text::GroupError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
