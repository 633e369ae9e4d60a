//! BLAKE3 keys for cached match results.

use blake3::Hasher;

/// 32-byte cache key.
pub type MatchKey = [u8; 32];

/// Hashes one `(document, query, threshold)` triple.
///
/// Strings are length-prefixed so `("ab", "c")` and `("a", "bc")` never collide, and
/// the threshold is hashed by bit pattern: `0.6` and `0.60000001` are distinct keys
/// whenever they are distinct `f32`s.
#[inline]
pub fn hash_match_key(document: &str, query: &str, threshold: f32) -> MatchKey {
    let mut hasher = Hasher::new();
    update_str(&mut hasher, document);
    update_str(&mut hasher, query);
    hasher.update(&threshold.to_bits().to_le_bytes());
    *hasher.finalize().as_bytes()
}

#[inline]
fn update_str(hasher: &mut Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// Lowercase hex of the first 8 bytes, for logs.
pub fn short_hex(key: &MatchKey) -> String {
    key[..8].iter().map(|b| format!("{b:02x}")).collect()
}
