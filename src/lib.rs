//! Shielded Vault: a threshold-multisig authorization and custody core
//!
//! This crate provides the two subsystems of a shared-control fund:
//! - A **multisig authorization engine**: replay-safe, order-verified
//!   threshold signature checking that gates every outgoing transfer
//!   and every governance change
//! - A **shielded custody ledger**: per-funder deposit tracking and the
//!   time-windowed state machine deciding when claims open and how much
//!   each funder may withdraw pro-rata
//!
//! Signatures are collected off-chain (the `vault` binary covers that
//! workflow) and submitted as a bundle ordered by recovered signer
//! address. Every authorization consumes one nonce slot, so an approved
//! bundle can never be replayed.
//!
//! # Example
//!
//! ```rust
//! use shielded_vault::core::Action;
//! use shielded_vault::crypto::KeyPair;
//! use shielded_vault::vault::{MemoryGateway, Vault, VaultConfig};
//!
//! // Three owners; signature bundles must be in ascending address order
//! let mut keys: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
//! keys.sort_by_key(|k| k.address());
//!
//! let config = VaultConfig {
//!     vault_address: KeyPair::generate().address(),
//!     chain_id: 1,
//!     owners: keys.iter().map(|k| k.address()).collect(),
//!     threshold: 2,
//!     claim_eligibility: None,
//! };
//! let mut vault = Vault::new(config, MemoryGateway::new()).unwrap();
//!
//! // A funder deposits while the claim window is unarmed: shielded
//! let funder = KeyPair::generate().address();
//! assert!(vault.deposit(funder, 1_000).shielded);
//!
//! // Two owners co-sign an outgoing transfer
//! let recipient = KeyPair::generate().address();
//! let action = Action::Transfer { to: recipient, value: 250, payload: vec![] };
//! let digest = vault.digest_for(&action);
//! let signatures: Vec<Vec<u8>> = keys[..2]
//!     .iter()
//!     .map(|k| k.sign_recoverable(&digest).to_vec())
//!     .collect();
//!
//! let receipt = vault
//!     .authorize(keys[0].address(), action, &signatures, 0)
//!     .unwrap();
//! assert_eq!(receipt.nonce, 0);
//! assert_eq!(vault.custody_balance(), 750);
//! ```

pub mod cli;
pub mod core;
pub mod crypto;
pub mod vault;

// Re-export commonly used types
pub use core::{authorization_digest, Action, Address, GovernanceOp, VaultEvent};
pub use crypto::{recover_signer, KeyPair};
pub use vault::{
    AuthorizationReceipt, CustodyPhase, DepositReceipt, ExecutionGateway, MemoryGateway,
    OwnerRegistry, ShieldedCustodyLedger, Vault, VaultConfig, VaultError,
};
