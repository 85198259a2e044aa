//! Threshold-multisig custody vault
//!
//! Owners jointly authorize outgoing transfers and governance with
//! off-chain-collected signatures; funders deposit value under a
//! shielding guarantee and withdraw pro-rata once claims open.
//!
//! # Example
//!
//! ```ignore
//! use shielded_vault::vault::{MemoryGateway, Vault, VaultConfig};
//!
//! let mut vault = Vault::new(config, MemoryGateway::new())?;
//!
//! // Funders deposit while the claim window is unarmed
//! vault.deposit(funder, 100);
//!
//! // Owners approve an outgoing transfer off-chain
//! let digest = vault.digest_for(&action);
//! let receipt = vault.authorize(owner, action, &signatures, now)?;
//! ```

pub mod config;
pub mod gateway;
pub mod ledger;
pub mod owners;
pub mod vault;

pub use config::{ConfigError, VaultConfig};
pub use gateway::{CallOutcome, ExecutionGateway, MemoryGateway, RecordedCall};
pub use ledger::{CustodyPhase, LedgerError, ShieldedCustodyLedger};
pub use owners::{OwnerError, OwnerRegistry};
pub use vault::{AuthorizationReceipt, DepositReceipt, Vault, VaultError};
