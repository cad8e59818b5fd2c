// dashboard-web/src/utils/token.rs
use sha2::{Digest, Sha256};

/// SHA-256 of a bearer token, hex encoded.
///
/// Used as the cache partition key so raw tokens never sit in memory maps.
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
