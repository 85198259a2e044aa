//! Cryptographic utilities for the vault
//!
//! This module provides:
//! - SHA-256 hashing (authorization digests, address checksums)
//! - ECDSA key management with recoverable signatures (secp256k1)

pub mod hash;
pub mod keys;

pub use hash::{double_sha256, sha256, sha256_array, sha256_hex};
pub use keys::{recover_signer, KeyError, KeyPair, SIGNATURE_LENGTH};
