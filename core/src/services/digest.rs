//! Token digests used for storage keys and log lines

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a token
pub(crate) fn sha256_hex(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Short digest safe to print in logs
pub(crate) fn fingerprint(token: &str) -> String {
    let mut digest = sha256_hex(token);
    digest.truncate(12);
    digest
}
