//! Password reset tokens
//!
//! Tokens are random, sent to the user once, and only their hash is stored.

use rand::Rng;
use sha2::{Digest, Sha256};

/// 32 random bytes, hex encoded. Shown to the user exactly once.
pub fn generate_reset_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Hex-encoded SHA-256 of the token, the only form that touches storage.
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
