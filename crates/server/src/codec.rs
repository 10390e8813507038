//! Wire codec for the OCR frame protocol.
//!
//! A request is a fixed 12-byte header of three little-endian `u32`s
//! `(width, height, payload_size)` followed by exactly `payload_size` bytes
//! of raw interleaved RGB. The response is one UTF-8 JSON object per frame.

use livecap_ocr::Frame;
use livecap_text::{BoundingBox, Paragraph};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{Result, ServerError};

pub const HEADER_BYTES: usize = 12;

/// Refuse payloads past this size rather than letting a corrupt header
/// drive allocation (256 MiB covers 8K RGB with headroom).
const MAX_PAYLOAD_BYTES: u32 = 1 << 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub width: u32,
    pub height: u32,
    pub payload_size: u32,
}

impl FrameHeader {
    pub fn parse(bytes: &[u8; HEADER_BYTES]) -> Self {
        Self {
            width: u32::from_le_bytes(bytes[0..4].try_into().unwrap()),
            height: u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
            payload_size: u32::from_le_bytes(bytes[8..12].try_into().unwrap()),
        }
    }

    pub fn encode(&self) -> [u8; HEADER_BYTES] {
        let mut out = [0u8; HEADER_BYTES];
        out[0..4].copy_from_slice(&self.width.to_le_bytes());
        out[4..8].copy_from_slice(&self.height.to_le_bytes());
        out[8..12].copy_from_slice(&self.payload_size.to_le_bytes());
        out
    }

    fn expected_payload(&self) -> Option<u32> {
        self.width
            .checked_mul(self.height)
            .and_then(|px| px.checked_mul(3))
    }
}

/// Read one frame off the wire.
///
/// A short read anywhere is [`ServerError::ConnectionLost`]. A header whose
/// `payload_size` disagrees with `width * height * 3` still has its payload
/// drained so the stream stays framed, then fails with
/// [`ServerError::MalformedFrame`].
pub async fn read_frame<R>(reader: &mut R) -> Result<Frame>
where
    R: AsyncRead + Unpin,
{
    let mut header_bytes = [0u8; HEADER_BYTES];
    reader
        .read_exact(&mut header_bytes)
        .await
        .map_err(|_| ServerError::ConnectionLost)?;
    let header = FrameHeader::parse(&header_bytes);

    if header.payload_size > MAX_PAYLOAD_BYTES {
        return Err(ServerError::ConnectionLost);
    }

    let mut payload = vec![0u8; header.payload_size as usize];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|_| ServerError::ConnectionLost)?;

    if header.expected_payload() != Some(header.payload_size) {
        return Err(ServerError::MalformedFrame(format!(
            "{}x{} declares {} payload bytes",
            header.width, header.height, header.payload_size
        )));
    }

    Frame::new(header.width, header.height, payload).map_err(ServerError::from)
}

/// Post-grouping result for one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FrameResponse {
    pub texts: Vec<String>,
    pub boxes: Vec<BoundingBox>,
}

impl FrameResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        let mut texts = Vec::with_capacity(paragraphs.len());
        let mut boxes = Vec::with_capacity(paragraphs.len());
        for p in paragraphs {
            texts.push(p.text);
            boxes.push(p.bbox);
        }
        Self { texts, boxes }
    }
}

/// Serialize and send one response; exactly one per received frame.
pub async fn write_response<W>(writer: &mut W, response: &FrameResponse) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_vec(response).map_err(std::io::Error::from)?;
    writer
        .write_all(&json)
        .await
        .map_err(|_| ServerError::ConnectionLost)?;
    writer.flush().await.map_err(|_| ServerError::ConnectionLost)?;
    Ok(())
}
