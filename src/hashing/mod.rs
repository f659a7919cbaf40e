//! Query normalization and fingerprinting.
//!
//! The fingerprint deduplicates concurrent write-backs: two requests asking
//! the same question (modulo whitespace) must map to the same 64-bit key so
//! their synthesize-and-insert sections serialize.

/// Collapses runs of whitespace to single spaces and truncates to `max_chars`
/// characters. This is the exact text sent to the embedding collaborator,
/// so the fingerprint and the embedding always agree on the input.
pub fn normalize_query(text: &str, max_chars: usize) -> String {
    let collapsed: Vec<&str> = text.split_whitespace().collect();
    let mut normalized = collapsed.join(" ");

    if normalized.chars().count() > max_chars {
        normalized = normalized.chars().take(max_chars).collect();
    }

    normalized
}

/// Computes a 64-bit fingerprint of normalized query text, truncated from a
/// BLAKE3 hash. 64 bits is ample for the lock registry: a collision merely
/// serializes two unrelated write-backs, it never corrupts data.
#[inline]
pub fn fingerprint_query(normalized: &str) -> u64 {
    let hash = blake3::hash(normalized.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
