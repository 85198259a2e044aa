//! Observable vault records
//!
//! Every state change appends a `VaultEvent` to the vault's in-memory
//! event log. Persistent indexing and display of historical events is
//! the host's concern; the vault only guarantees the records exist and
//! are ordered.

use serde::{Deserialize, Serialize};

use crate::core::{Action, Address};

/// A record emitted by a vault state change
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VaultEvent {
    /// Inbound value arrived; `shielded` reports whether it was credited
    /// to the sender's funder balance
    Deposit {
        sender: Address,
        amount: u64,
        shielded: bool,
        custody_total: u64,
    },
    /// An authorization consumed a nonce slot (emitted for successful
    /// execution and for failures after signature acceptance alike)
    Authorization {
        caller: Address,
        action: Action,
        nonce: u64,
        digest: String,
        success: bool,
        return_data: String,
    },
    /// Owner membership changed through governance
    OwnershipChange { owner: Address, is_member: bool },
    /// The claim window was armed
    WindowStart {
        initiator: Address,
        started_at: u64,
        duration: u64,
        deadline: u64,
    },
    /// Claims were opened (deadline passed, anyone flipped the switch)
    ClaimsOpened { initiator: Address, opened_at: u64 },
    /// A funder consumed their entitlement
    Claim {
        funder: Address,
        payout_to: Address,
        amount: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::ADDRESS_LENGTH;

    #[test]
    fn test_events_serialize_tagged() {
        let event = VaultEvent::Deposit {
            sender: Address::from_bytes([3; ADDRESS_LENGTH]),
            amount: 100,
            shielded: true,
            custody_total: 100,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Deposit\""));
        assert!(json.contains("\"shielded\":true"));

        let back: VaultEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, VaultEvent::Deposit { amount: 100, .. }));
    }
}
