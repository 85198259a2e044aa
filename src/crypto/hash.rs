//! Cryptographic hashing utilities for the vault
//!
//! Provides the SHA-256 based hashing functions used for authorization
//! digests and address checksums.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 and returns the fixed-size digest array
///
/// Authorization digests are exactly 32 bytes; this variant avoids the
/// intermediate allocation where the caller needs `[u8; 32]`.
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Computes double SHA-256 hash (SHA-256 of SHA-256)
/// Used for the Base58Check address checksum
pub fn double_sha256(data: &[u8]) -> Vec<u8> {
    sha256(&sha256(data))
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
