//! Vault identity addresses
//!
//! An `Address` is the 20-byte identity shared by owners, funders and
//! payout destinations: `RIPEMD160(SHA256(compressed public key))`.
//! The raw bytes are totally ordered, which is what the authorizer's
//! strict-ascending signature check relies on. The text form is
//! Bitcoin-style Base58Check (version byte + payload + 4-byte checksum).

use ripemd::{Digest, Ripemd160};
use secp256k1::PublicKey;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::crypto::{double_sha256, sha256};

/// Length of a raw address in bytes
pub const ADDRESS_LENGTH: usize = 20;

/// Base58Check version byte for vault addresses
const VERSION_BYTE: u8 = 0x00;

/// Errors from parsing the Base58Check text form
#[derive(Error, Debug)]
pub enum AddressParseError {
    #[error("Invalid Base58 encoding")]
    InvalidBase58,
    #[error("Invalid address length: {0} bytes")]
    InvalidLength(usize),
    #[error("Invalid version byte: {0:#04x}")]
    InvalidVersion(u8),
    #[error("Checksum mismatch")]
    InvalidChecksum,
}

/// A 20-byte vault identity
///
/// The all-zero address is the null identity; it is never a valid owner.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The null identity (all zero bytes)
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Create an address from raw bytes
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derive an address from a secp256k1 public key
    ///
    /// Bitcoin-style derivation: `RIPEMD160(SHA256(compressed pubkey))`.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let sha = sha256(&public_key.serialize());
        let mut ripemd = Ripemd160::new();
        ripemd.update(&sha);

        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&ripemd.finalize());
        Self(bytes)
    }

    /// Whether this is the null identity
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Raw address bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl fmt::Display for Address {
    /// Base58Check: version byte || payload || first 4 bytes of double SHA-256
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut data = vec![VERSION_BYTE];
        data.extend_from_slice(&self.0);

        let checksum = double_sha256(&data);
        data.extend_from_slice(&checksum[..4]);

        write!(f, "{}", bs58::encode(data).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = bs58::decode(s)
            .into_vec()
            .map_err(|_| AddressParseError::InvalidBase58)?;

        // version + payload + checksum
        if data.len() != 1 + ADDRESS_LENGTH + 4 {
            return Err(AddressParseError::InvalidLength(data.len()));
        }
        if data[0] != VERSION_BYTE {
            return Err(AddressParseError::InvalidVersion(data[0]));
        }

        let (body, checksum) = data.split_at(1 + ADDRESS_LENGTH);
        if double_sha256(body)[..4] != *checksum {
            return Err(AddressParseError::InvalidChecksum);
        }

        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&body[1..]);
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(DeError::custom)
    }
}
