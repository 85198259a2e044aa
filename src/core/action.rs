//! Tagged action requests
//!
//! Every privileged state change goes through the authorizer as an
//! `Action`: either an outgoing value transfer or a governance operation
//! on the vault itself. Modeling governance as an action variant (rather
//! than separately callable entry points) makes direct privileged
//! invocation unrepresentable.

use serde::{Deserialize, Serialize};

use crate::core::Address;

/// A governance operation applied to the vault's own configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceOp {
    /// Add an owner and set a new signature threshold
    AddOwner { owner: Address, new_threshold: u32 },
    /// Remove an owner and set a new signature threshold
    RemoveOwner { owner: Address, new_threshold: u32 },
    /// Change the signature threshold
    SetThreshold { new_threshold: u32 },
    /// Arm the claim window: the deadline becomes `now + duration`
    /// and deposits stop being shielded
    StartClaimWindow { duration: u64 },
}

/// An action pending threshold authorization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Send `value` to `to`, invoking it with `payload`
    Transfer {
        to: Address,
        value: u64,
        payload: Vec<u8>,
    },
    /// Apply a governance operation to the vault itself
    Governance(GovernanceOp),
}

impl Action {
    /// Canonical byte encoding, the exact bytes mixed into the
    /// authorization digest
    ///
    /// Layout (all integers big-endian):
    /// - `Transfer`:   `0x00 || to(20) || value(8) || payload_len(4) || payload`
    /// - `Governance`: `0x01 || op_tag(1) || op fields`
    ///   - `AddOwner`:         tag `0x00`, `owner(20) || new_threshold(4)`
    ///   - `RemoveOwner`:      tag `0x01`, `owner(20) || new_threshold(4)`
    ///   - `SetThreshold`:     tag `0x02`, `new_threshold(4)`
    ///   - `StartClaimWindow`: tag `0x03`, `duration(8)`
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(34);
        match self {
            Action::Transfer { to, value, payload } => {
                out.push(0x00);
                out.extend_from_slice(to.as_bytes());
                out.extend_from_slice(&value.to_be_bytes());
                out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
                out.extend_from_slice(payload);
            }
            Action::Governance(op) => {
                out.push(0x01);
                match op {
                    GovernanceOp::AddOwner {
                        owner,
                        new_threshold,
                    } => {
                        out.push(0x00);
                        out.extend_from_slice(owner.as_bytes());
                        out.extend_from_slice(&new_threshold.to_be_bytes());
                    }
                    GovernanceOp::RemoveOwner {
                        owner,
                        new_threshold,
                    } => {
                        out.push(0x01);
                        out.extend_from_slice(owner.as_bytes());
                        out.extend_from_slice(&new_threshold.to_be_bytes());
                    }
                    GovernanceOp::SetThreshold { new_threshold } => {
                        out.push(0x02);
                        out.extend_from_slice(&new_threshold.to_be_bytes());
                    }
                    GovernanceOp::StartClaimWindow { duration } => {
                        out.push(0x03);
                        out.extend_from_slice(&duration.to_be_bytes());
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::ADDRESS_LENGTH;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; ADDRESS_LENGTH])
    }

    #[test]
    fn test_canonical_bytes_deterministic() {
        let action = Action::Transfer {
            to: addr(7),
            value: 42,
            payload: vec![1, 2, 3],
        };
        assert_eq!(action.canonical_bytes(), action.canonical_bytes());
    }

    #[test]
    fn test_canonical_bytes_distinguish_variants() {
        let transfer = Action::Transfer {
            to: addr(7),
            value: 42,
            payload: vec![],
        };
        let governance = Action::Governance(GovernanceOp::SetThreshold { new_threshold: 42 });
        assert_ne!(transfer.canonical_bytes(), governance.canonical_bytes());

        let add = Action::Governance(GovernanceOp::AddOwner {
            owner: addr(7),
            new_threshold: 2,
        });
        let remove = Action::Governance(GovernanceOp::RemoveOwner {
            owner: addr(7),
            new_threshold: 2,
        });
        assert_ne!(add.canonical_bytes(), remove.canonical_bytes());
    }

    #[test]
    fn test_canonical_bytes_cover_every_field() {
        let base = Action::Transfer {
            to: addr(7),
            value: 42,
            payload: vec![1],
        };
        let other_to = Action::Transfer {
            to: addr(8),
            value: 42,
            payload: vec![1],
        };
        let other_value = Action::Transfer {
            to: addr(7),
            value: 43,
            payload: vec![1],
        };
        let other_payload = Action::Transfer {
            to: addr(7),
            value: 42,
            payload: vec![2],
        };

        let encoded = base.canonical_bytes();
        assert_ne!(encoded, other_to.canonical_bytes());
        assert_ne!(encoded, other_value.canonical_bytes());
        assert_ne!(encoded, other_payload.canonical_bytes());
    }

    #[test]
    fn test_transfer_layout() {
        let action = Action::Transfer {
            to: addr(0xaa),
            value: 1,
            payload: vec![0xff],
        };
        let bytes = action.canonical_bytes();
        assert_eq!(bytes[0], 0x00);
        assert_eq!(&bytes[1..21], &[0xaa; ADDRESS_LENGTH]);
        assert_eq!(&bytes[21..29], &1u64.to_be_bytes());
        assert_eq!(&bytes[29..33], &1u32.to_be_bytes());
        assert_eq!(&bytes[33..], &[0xff]);
    }
}
