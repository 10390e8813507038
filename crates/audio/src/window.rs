//! Fixed-duration rolling sample buffer.
//!
//! Holds the most recent `capacity_seconds` of 16-bit mono PCM. Appends past
//! capacity evict from the front, so the buffer is always the tail of
//! everything ever appended.

use std::io::Cursor;

use crate::{AudioError, Result, SAMPLE_WIDTH_BYTES};

/// Most-recent-samples audio buffer feeding full-window re-transcription.
///
/// Owned exclusively by one transcription session; mutated only through
/// [`append`](Self::append) and [`clear`](Self::clear).
#[derive(Debug)]
pub struct RollingWindow {
    samples: Vec<i16>,
    max_samples: usize,
    sample_rate: u32,
}

impl RollingWindow {
    pub fn new(capacity_seconds: f32, sample_rate: u32) -> Self {
        let max_samples = (capacity_seconds * sample_rate as f32) as usize;
        Self {
            samples: Vec::with_capacity(max_samples),
            max_samples,
            sample_rate,
        }
    }

    /// Append a chunk, keeping only the most recent `max_samples` samples.
    pub fn append(&mut self, chunk: &[i16]) {
        self.samples.extend_from_slice(chunk);
        let excess = self.samples.len().saturating_sub(self.max_samples);
        if excess > 0 {
            self.samples.drain(0..excess);
            tracing::trace!(evicted = excess, "rolling window evicted oldest samples");
        }
    }

    /// Append raw little-endian PCM bytes.
    ///
    /// Fails when the byte length is not a whole number of 16-bit samples,
    /// leaving the buffer unchanged.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() % SAMPLE_WIDTH_BYTES != 0 {
            return Err(AudioError::InvalidEncoding(bytes.len()));
        }
        let chunk = crate::i16_from_le_bytes(bytes);
        self.append(&chunk);
        Ok(())
    }

    /// Drop all buffered audio. Called on detected silence so stale context
    /// cannot leak into the next utterance's inference.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn capacity(&self) -> usize {
        self.max_samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Serialize the buffer to a self-describing WAV container (16-bit mono
    /// at the window's sample rate).
    ///
    /// Fails with [`AudioError::EmptyBuffer`] on an empty window; callers
    /// must check [`is_empty`](Self::is_empty) and skip inference rather
    /// than hand the model zero samples.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        if self.samples.is_empty() {
            return Err(AudioError::EmptyBuffer);
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| AudioError::EncodingFailed(e.to_string()))?;
            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| AudioError::EncodingFailed(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| AudioError::EncodingFailed(e.to_string()))?;
        }

        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_1s() -> RollingWindow {
        // 1 second capacity at a tiny rate keeps test vectors readable
        RollingWindow::new(1.0, 8)
    }

    #[test]
    fn append_within_capacity_keeps_everything() {
        let mut w = window_1s();
        w.append(&[1, 2, 3]);
        assert_eq!(w.samples(), &[1, 2, 3]);
        assert!(!w.is_empty());
    }

    #[test]
    fn append_past_capacity_keeps_tail() {
        let mut w = window_1s();
        w.append(&[1, 2, 3, 4, 5, 6]);
        w.append(&[7, 8, 9, 10]);
        // capacity is 8 samples; the oldest two are gone
        assert_eq!(w.samples(), &[3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(w.len(), w.capacity());
    }

    #[test]
    fn buffer_is_always_suffix_of_full_stream() {
        let mut w = window_1s();
        let mut full = Vec::new();
        for i in 0..20i16 {
            let chunk = [i * 3, i * 3 + 1, i * 3 + 2];
            w.append(&chunk);
            full.extend_from_slice(&chunk);
            assert!(w.len() <= w.capacity());
            assert_eq!(w.samples(), &full[full.len() - w.len()..]);
        }
    }

    #[test]
    fn clear_empties_buffer() {
        let mut w = window_1s();
        w.append(&[1, 2, 3]);
        w.clear();
        assert!(w.is_empty());
        assert!(matches!(w.to_wav_bytes(), Err(AudioError::EmptyBuffer)));
    }

    #[test]
    fn append_bytes_rejects_odd_length() {
        let mut w = window_1s();
        let err = w.append_bytes(&[0, 1, 2]).unwrap_err();
        assert!(matches!(err, AudioError::InvalidEncoding(3)));
        assert!(w.is_empty());
    }

    #[test]
    fn append_bytes_decodes_little_endian() {
        let mut w = window_1s();
        w.append_bytes(&[0x01, 0x00, 0xFF, 0xFF]).unwrap();
        assert_eq!(w.samples(), &[1, -1]);
    }

    #[test]
    fn wav_bytes_roundtrip() {
        let mut w = RollingWindow::new(1.0, 16000);
        w.append(&[0, 100, -100, i16::MAX, i16::MIN]);

        let bytes = w.to_wav_bytes().unwrap();
        let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().bits_per_sample, 16);

        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, vec![0, 100, -100, i16::MAX, i16::MIN]);
    }
}
