//! Locality-sensitive text fingerprints.
//!
//! Two fragments about the same subject share character n-grams and so land
//! near each other in Hamming space. Features are hashed with FNV-1a, which
//! is stable across processes and platforms.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a64(data: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// 64-bit simhash over character unigrams and bigrams.
pub fn simhash64(text: &str) -> u64 {
    let chars: Vec<char> = text.chars().collect();
    let mut counts = [0i32; 64];

    let mut add_feature = |feature: &str| {
        let h = fnv1a64(feature.as_bytes());
        for (bit, count) in counts.iter_mut().enumerate() {
            if (h >> bit) & 1 == 1 {
                *count += 1;
            } else {
                *count -= 1;
            }
        }
    };

    let mut buf = String::new();
    for &c in &chars {
        buf.clear();
        buf.push(c);
        add_feature(&buf);
    }
    for pair in chars.windows(2) {
        buf.clear();
        buf.push(pair[0]);
        buf.push(pair[1]);
        add_feature(&buf);
    }
    if chars.is_empty() {
        add_feature(text);
    }

    let mut out = 0u64;
    for (bit, &count) in counts.iter().enumerate() {
        if count > 0 {
            out |= 1 << bit;
        }
    }
    out
}

/// Normalized Hamming similarity of two fingerprints, in `[0, 1]`.
pub fn similarity(a: u64, b: u64) -> f32 {
    1.0 - (a ^ b).count_ones() as f32 / 64.0
}
