//! PCM encoding conversions.

/// Convert float PCM in [-1, 1] to 16-bit signed samples.
///
/// Out-of-range input is clamped before scaling, matching what capture
/// pipelines do when a gain stage pushes samples past full scale.
pub fn f32_to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

/// Decode little-endian 16-bit PCM bytes. The caller must pass a whole
/// number of samples.
pub fn i16_from_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_and_clamps() {
        let out = f32_to_i16(&[0.0, 1.0, -1.0, 2.0, -3.0]);
        assert_eq!(out[0], 0);
        assert_eq!(out[1], i16::MAX);
        assert_eq!(out[3], i16::MAX); // clamped
        assert_eq!(out[4], -i16::MAX); // clamped
    }

    #[test]
    fn half_scale() {
        let out = f32_to_i16(&[0.5]);
        assert!((out[0] as i32 - (i16::MAX as i32 / 2)).abs() <= 1);
    }

    #[test]
    fn le_bytes_decode() {
        assert_eq!(i16_from_le_bytes(&[0x34, 0x12]), vec![0x1234]);
    }
}
