//! Frame-level text detection seam.
//!
//! The OCR model itself lives outside this workspace; sessions talk to it
//! through [`TextDetector`] and only handle validated frames and
//! confidence-filtered detections.

use livecap_text::{BoundingBox, TextFragment};

/// Detections scoring below this are dropped before grouping.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.85;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("frame dimensions {width}x{height} require {expected} bytes, got {actual}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("detection failed: {0}")]
    DetectionFailed(String),
}

pub type Result<T> = std::result::Result<T, OcrError>;

/// One raw video/screen frame: interleaved RGB, row-major, 3 bytes per pixel.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(OcrError::DimensionMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// One detected line of text within a frame.
#[derive(Debug, Clone)]
pub struct Detection {
    pub text: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// External OCR capability: detect text lines in one frame.
pub trait TextDetector: Send + Sync {
    fn detect(&self, frame: &Frame) -> Result<Vec<Detection>>;

    fn model_name(&self) -> &str {
        "unknown"
    }
}

/// Drop low-confidence detections and convert the rest into fragments.
///
/// Dropped detections are logged so a rejected unit is always accounted for.
pub fn filter_confident(detections: Vec<Detection>, min_confidence: f32) -> Vec<TextFragment> {
    let total = detections.len();
    let fragments: Vec<TextFragment> = detections
        .into_iter()
        .filter(|d| d.confidence >= min_confidence)
        .map(|d| TextFragment::new(d.text, d.bbox, d.confidence))
        .collect();

    let dropped = total - fragments.len();
    if dropped > 0 {
        tracing::debug!(dropped, total, min_confidence, "low-confidence detections dropped");
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_accepts_matching_payload() {
        let frame = Frame::new(2, 1, vec![0; 6]).unwrap();
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 1);
        assert_eq!(frame.pixels().len(), 6);
    }

    #[test]
    fn frame_rejects_mismatched_payload() {
        let err = Frame::new(2, 1, vec![0; 5]).unwrap_err();
        assert!(matches!(
            err,
            OcrError::DimensionMismatch {
                expected: 6,
                actual: 5,
                ..
            }
        ));
    }

    #[test]
    fn confidence_filter_drops_below_threshold() {
        let bbox = BoundingBox::new(0, 0, 1, 1);
        let detections = vec![
            Detection {
                text: "keep".into(),
                confidence: 0.9,
                bbox,
            },
            Detection {
                text: "drop".into(),
                confidence: 0.4,
                bbox,
            },
            Detection {
                text: "edge".into(),
                confidence: 0.85,
                bbox,
            },
        ];

        let fragments = filter_confident(detections, DEFAULT_MIN_CONFIDENCE);
        let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["keep", "edge"]);
    }
}
