//! Canonical authorization digest
//!
//! The digest is the exact 32 bytes an owner signs off-chain. It binds
//! the approval to one deployment (vault address), one network
//! (chain id), one pending slot (nonce) and one exact action, so a
//! signature bundle collected for any of those can never be replayed
//! against another.

use crate::core::{Action, Address};
use crate::crypto::sha256_array;

/// Domain-separation prefix for authorization digests
pub const DIGEST_TAG: &[u8] = b"shielded-vault/authorize/v1";

/// Compute the authorization digest for a pending action
///
/// Layout: `SHA-256(tag || vault_address(20) || chain_id(8, BE) ||
/// nonce(8, BE) || action canonical bytes)`. See
/// [`Action::canonical_bytes`] for the action layout.
pub fn authorization_digest(
    vault_address: &Address,
    chain_id: u64,
    nonce: u64,
    action: &Action,
) -> [u8; 32] {
    let action_bytes = action.canonical_bytes();

    let mut preimage =
        Vec::with_capacity(DIGEST_TAG.len() + 20 + 8 + 8 + action_bytes.len());
    preimage.extend_from_slice(DIGEST_TAG);
    preimage.extend_from_slice(vault_address.as_bytes());
    preimage.extend_from_slice(&chain_id.to_be_bytes());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(&action_bytes);

    sha256_array(&preimage)
}
