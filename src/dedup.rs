use std::collections::HashSet;

use sha2::{Digest, Sha256};

/// Shingle width in words. Five-word shingles are wide enough that shared
/// phrases do not count as duplication, narrow enough to catch reordered
/// boilerplate.
pub const SHINGLE_K: usize = 5;

fn shingle_hash(shingle: &str) -> u64 {
    let digest = Sha256::digest(shingle.as_bytes());
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Hashed k-word shingle set of `text`. Texts shorter than `k` words hash
/// as a single shingle so short nav/footer fragments still compare.
pub fn shingle_signature(text: &str, k: usize) -> HashSet<u64> {
    let words = text
        .to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect::<Vec<String>>();

    if words.is_empty() {
        return HashSet::new();
    }

    if words.len() <= k {
        return HashSet::from([shingle_hash(&words.join(" "))]);
    }

    words
        .windows(k)
        .map(|window| shingle_hash(&window.join(" ")))
        .collect()
}

/// Jaccard similarity over shingle hash sets. Empty-vs-anything is 0.0.
pub fn similarity(a: &HashSet<u64>, b: &HashSet<u64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}
