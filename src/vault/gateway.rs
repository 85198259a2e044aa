//! Execution gateway
//!
//! The boundary that actually moves value and invokes payloads once an
//! action is authorized. The vault treats it as an external
//! collaborator: failure is reported data, never a panic, and the vault
//! decides what a failed outcome means (a consumed nonce, an intact
//! claim entitlement).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::Address;

/// Result of a downstream call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallOutcome {
    pub success: bool,
    pub return_data: Vec<u8>,
}

impl CallOutcome {
    /// A successful outcome carrying return data
    pub fn ok(return_data: Vec<u8>) -> Self {
        Self {
            success: true,
            return_data,
        }
    }

    /// A failed outcome with no data
    pub fn failed() -> Self {
        Self {
            success: false,
            return_data: Vec::new(),
        }
    }
}

/// Host boundary for outgoing value movement and payload invocation
pub trait ExecutionGateway {
    /// Perform an authorized call against `to` with `value` and `payload`
    fn execute(&mut self, to: Address, value: u64, payload: &[u8]) -> CallOutcome;

    /// Move `amount` to `to` (claim payouts); `false` means rejected
    fn transfer(&mut self, to: Address, amount: u64) -> bool;
}

/// A call recorded by [`MemoryGateway`]
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub to: Address,
    pub value: u64,
    pub payload: Vec<u8>,
}

/// In-memory gateway for tests, doctests and demos
///
/// Credits per-address balances, records every call, and can be told to
/// refuse calls or transfers to exercise the vault's failure paths.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    balances: HashMap<Address, u64>,
    calls: Vec<RecordedCall>,
    pub refuse_calls: bool,
    pub refuse_transfers: bool,
}

impl MemoryGateway {
    /// Create an empty gateway that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Total value delivered to an address
    pub fn balance_of(&self, address: &Address) -> u64 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// All calls performed through `execute`
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }
}

impl ExecutionGateway for MemoryGateway {
    fn execute(&mut self, to: Address, value: u64, payload: &[u8]) -> CallOutcome {
        if self.refuse_calls {
            return CallOutcome::failed();
        }

        *self.balances.entry(to).or_insert(0) += value;
        self.calls.push(RecordedCall {
            to,
            value,
            payload: payload.to_vec(),
        });
        CallOutcome::ok(Vec::new())
    }

    fn transfer(&mut self, to: Address, amount: u64) -> bool {
        if self.refuse_transfers {
            return false;
        }
        *self.balances.entry(to).or_insert(0) += amount;
        true
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
    fn test_execute_credits_and_records() {
        let mut gateway = MemoryGateway::new();
        let outcome = gateway.execute(addr(1), 75, &[0xab]);

        assert!(outcome.success);
        assert_eq!(gateway.balance_of(&addr(1)), 75);
        assert_eq!(gateway.calls().len(), 1);
        assert_eq!(gateway.calls()[0].payload, vec![0xab]);
    }

    #[test]
    fn test_refusal_flags() {
        let mut gateway = MemoryGateway::new();
        gateway.refuse_calls = true;
        gateway.refuse_transfers = true;

        assert!(!gateway.execute(addr(1), 10, &[]).success);
        assert!(!gateway.transfer(addr(1), 10));
        assert_eq!(gateway.balance_of(&addr(1)), 0);
    }

    #[test]
    fn test_transfer_accumulates() {
        let mut gateway = MemoryGateway::new();
        assert!(gateway.transfer(addr(2), 40));
        assert!(gateway.transfer(addr(2), 60));
        assert_eq!(gateway.balance_of(&addr(2)), 100);
    }
}
