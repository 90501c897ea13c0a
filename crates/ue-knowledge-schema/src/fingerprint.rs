//! Content fingerprinting for idempotent upserts (spec §3.1, §4.2).
//!
//! `fingerprint(text)` is the first 16 hex chars of SHA-256 over
//! `text.trim().to_lowercase()`. Any change to the normalized text changes
//! the fingerprint (spec §8 property 5).

use sha2::{Digest, Sha256};

#[must_use]
pub fn fingerprint(text: &str) -> String {
    let normalized = text.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    hex::encode(&digest[..8])
}
