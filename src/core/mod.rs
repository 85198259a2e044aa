//! Core data types for the vault
//!
//! This module contains the fundamental building blocks:
//! - The `Address` identity type shared by owners and funders
//! - Tagged `Action` requests (transfers and governance operations)
//! - The canonical authorization digest that off-chain signers sign
//! - Observable `VaultEvent` records

pub mod action;
pub mod address;
pub mod digest;
pub mod events;

pub use action::{Action, GovernanceOp};
pub use address::{Address, AddressParseError, ADDRESS_LENGTH};
pub use digest::{authorization_digest, DIGEST_TAG};
pub use events::VaultEvent;
