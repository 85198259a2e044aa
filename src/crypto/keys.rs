//! ECDSA key management for the vault
//!
//! Provides key pair generation and recoverable signing/recovery using
//! the secp256k1 elliptic curve (same as Bitcoin). Signatures are
//! *recoverable*: the signer's identity is derived from the digest and
//! signature alone, so the vault never stores public keys for owners.

use rand::rngs::OsRng;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use crate::core::Address;

/// Wire length of a recoverable signature: r(32) || s(32) || recovery_id(1)
pub const SIGNATURE_LENGTH: usize = 65;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Malformed signature")]
    MalformedSignature,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key
    pub fn from_secret_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the private key as a hex string
    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// Get the vault identity (address) for this key pair
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key)
    }

    /// Sign a 32-byte authorization digest, producing the 65-byte wire form
    pub fn sign_recoverable(&self, digest: &[u8; 32]) -> [u8; SIGNATURE_LENGTH] {
        let secp = Secp256k1::new();
        let message = Message::from_digest(*digest);
        let signature = secp.sign_ecdsa_recoverable(&message, &self.secret_key);
        let (recovery_id, compact) = signature.serialize_compact();

        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..64].copy_from_slice(&compact);
        out[64] = recovery_id.to_i32() as u8;
        out
    }
}

/// Recover the signer identity from a digest and a 65-byte signature
///
/// Pure and deterministic: the same digest and signature always yield the
/// same address. Any parse or recovery failure is reported as
/// [`KeyError::MalformedSignature`].
pub fn recover_signer(digest: &[u8; 32], signature: &[u8]) -> Result<Address, KeyError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(KeyError::MalformedSignature);
    }

    let recovery_id = RecoveryId::from_i32(signature[64] as i32)
        .map_err(|_| KeyError::MalformedSignature)?;
    let recoverable = RecoverableSignature::from_compact(&signature[..64], recovery_id)
        .map_err(|_| KeyError::MalformedSignature)?;

    let secp = Secp256k1::new();
    let message = Message::from_digest(*digest);
    let public_key = secp
        .recover_ecdsa(&message, &recoverable)
        .map_err(|_| KeyError::MalformedSignature)?;

    Ok(Address::from_public_key(&public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sha256_array;

    #[test]
    fn test_key_pair_generation() {
        let kp = KeyPair::generate();
        assert!(!kp.secret_hex().is_empty());
        assert!(!kp.public_key_hex().is_empty());
        assert!(!kp.address().is_zero());
    }

    #[test]
    fn test_sign_and_recover() {
        let kp = KeyPair::generate();
        let digest = sha256_array(b"pending action");

        let signature = kp.sign_recoverable(&digest);
        let recovered = recover_signer(&digest, &signature).unwrap();
        assert_eq!(recovered, kp.address());
    }

    #[test]
    fn test_recover_different_digest_yields_different_signer() {
        let kp = KeyPair::generate();
        let digest = sha256_array(b"approved action");
        let signature = kp.sign_recoverable(&digest);

        // A valid signature over different bytes recovers *some* key,
        // but not the signer's.
        let other = sha256_array(b"tampered action");
        match recover_signer(&other, &signature) {
            Ok(address) => assert_ne!(address, kp.address()),
            Err(KeyError::MalformedSignature) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_malformed_signature_rejected() {
        let digest = sha256_array(b"digest");

        // Wrong length
        assert!(matches!(
            recover_signer(&digest, &[0u8; 64]),
            Err(KeyError::MalformedSignature)
        ));

        // Recovery id out of range
        let kp = KeyPair::generate();
        let mut signature = kp.sign_recoverable(&digest);
        signature[64] = 4;
        assert!(matches!(
            recover_signer(&digest, &signature),
            Err(KeyError::MalformedSignature)
        ));
    }

    #[test]
    fn test_key_pair_from_hex() {
        let kp1 = KeyPair::generate();
        let secret = kp1.secret_hex();

        let kp2 = KeyPair::from_secret_hex(&secret).unwrap();
        assert_eq!(kp1.public_key_hex(), kp2.public_key_hex());
        assert_eq!(kp1.address(), kp2.address());
    }

    #[test]
    fn test_invalid_secret_hex_rejected() {
        assert!(KeyPair::from_secret_hex("not hex").is_err());
        assert!(KeyPair::from_secret_hex("abcd").is_err());
    }
}
