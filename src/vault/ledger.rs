//! Shielded custody ledger
//!
//! Per-funder balance tracking and the claim-window state machine.
//! Deposits made while the ledger is still in the `Funding` phase are
//! *shielded*: earmarked for the depositor rather than becoming
//! owner-controlled custody funds. Once the claim window is armed,
//! shielding stops; once claims open, each funder may withdraw their
//! pro-rata share of the custody's current value exactly once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::Address;

/// Errors from the claim-window state machine
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Claim window already initialized")]
    AlreadyInitialized,
    #[error("Claim window still open")]
    WindowStillOpen,
    #[error("Claims already open")]
    ClaimsAlreadyOpen,
    #[error("Claims not open")]
    ClaimsNotOpen,
    #[error("Claim window expired")]
    ClaimWindowExpired,
    #[error("Not a funder: {0}")]
    NotAFunder(Address),
}

/// Lifecycle phase of the custody ledger
///
/// Each transition happens exactly once:
/// `Funding` → `WindowArmed` → `ClaimsOpen`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustodyPhase {
    /// Initial phase; deposits are shielded
    Funding,
    /// The claim deadline is set; new deposits are no longer shielded
    WindowArmed { deadline: u64 },
    /// Claims are open; funders may withdraw pro-rata
    ClaimsOpen { deadline: u64, opened_at: u64 },
}

/// Per-funder bookkeeping and the claim-window state machine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShieldedCustodyLedger {
    /// Shielded balances; zeroed (entry kept) when a claim is consumed
    balances: BTreeMap<Address, u64>,
    /// Sum of all shielded deposits, the pro-rata denominator
    claimable_total: u64,
    /// Sum of all payouts made through claims
    claimed_total: u64,
    /// Lifetime claimed amount per funder
    claimed_by: BTreeMap<Address, u64>,
    /// How long claims stay eligible after opening; `None` = forever
    claim_eligibility: Option<u64>,
    phase: CustodyPhase,
}

impl ShieldedCustodyLedger {
    /// Create a ledger in the `Funding` phase
    pub fn new(claim_eligibility: Option<u64>) -> Self {
        Self {
            balances: BTreeMap::new(),
            claimable_total: 0,
            claimed_total: 0,
            claimed_by: BTreeMap::new(),
            claim_eligibility,
            phase: CustodyPhase::Funding,
        }
    }

    /// Record an inbound deposit; returns whether it was shielded
    ///
    /// Shielding applies only in the `Funding` phase. Later deposits
    /// become general custody value with no funder claim against them.
    pub fn deposit(&mut self, sender: Address, amount: u64) -> bool {
        match self.phase {
            CustodyPhase::Funding => {
                let balance = self.balances.entry(sender).or_insert(0);
                *balance = balance.saturating_add(amount);
                self.claimable_total = self.claimable_total.saturating_add(amount);
                true
            }
            CustodyPhase::WindowArmed { .. } | CustodyPhase::ClaimsOpen { .. } => false,
        }
    }

    /// Arm the claim window; returns the absolute deadline
    ///
    /// The deadline saturates at `u64::MAX`, so a huge governance-approved
    /// duration means "claims never open" rather than a wrapped deadline
    /// in the past.
    pub fn start_claim_window(&mut self, now: u64, duration: u64) -> Result<u64, LedgerError> {
        match self.phase {
            CustodyPhase::Funding => {
                let deadline = now.saturating_add(duration);
                self.phase = CustodyPhase::WindowArmed { deadline };
                Ok(deadline)
            }
            _ => Err(LedgerError::AlreadyInitialized),
        }
    }

    /// Open claims once the deadline has objectively passed
    ///
    /// Callable by anyone; the deadline check is the only gate. A second
    /// call is rejected so `opened_at` can never be reset.
    pub fn open_claims(&mut self, now: u64) -> Result<(), LedgerError> {
        match self.phase {
            // No deadline armed yet: treated as unreachable
            CustodyPhase::Funding => Err(LedgerError::WindowStillOpen),
            CustodyPhase::WindowArmed { deadline } => {
                if now < deadline {
                    return Err(LedgerError::WindowStillOpen);
                }
                self.phase = CustodyPhase::ClaimsOpen {
                    deadline,
                    opened_at: now,
                };
                Ok(())
            }
            CustodyPhase::ClaimsOpen { .. } => Err(LedgerError::ClaimsAlreadyOpen),
        }
    }

    /// Validate a claim and compute the payout, without consuming anything
    ///
    /// The payout is the caller's pro-rata share of the custody's
    /// *current* value: `balance × custody_value / claimable_total`,
    /// computed in `u128` so the multiplication never truncates before
    /// the division. The result is at most `custody_value`, so the
    /// narrowing back to `u64` is lossless.
    pub fn claimable_payout(
        &self,
        caller: &Address,
        now: u64,
        custody_value: u64,
    ) -> Result<u64, LedgerError> {
        let balance = self.balance_of(caller);
        if balance == 0 {
            return Err(LedgerError::NotAFunder(*caller));
        }

        let opened_at = match self.phase {
            CustodyPhase::ClaimsOpen { opened_at, .. } => opened_at,
            _ => return Err(LedgerError::ClaimsNotOpen),
        };

        if let Some(eligibility) = self.claim_eligibility {
            // Saturating: a huge eligibility means claims never expire
            if now >= opened_at.saturating_add(eligibility) {
                return Err(LedgerError::ClaimWindowExpired);
            }
        }

        // balance > 0 implies claimable_total > 0
        let payout =
            (balance as u128) * (custody_value as u128) / (self.claimable_total as u128);
        Ok(payout as u64)
    }

    /// Consume a funder's entitlement after a successful payout transfer
    pub fn record_claim(&mut self, caller: Address, payout: u64) {
        self.balances.insert(caller, 0);
        let claimed = self.claimed_by.entry(caller).or_insert(0);
        *claimed = claimed.saturating_add(payout);
        self.claimed_total = self.claimed_total.saturating_add(payout);
    }

    /// Shielded balance of a funder
    pub fn balance_of(&self, funder: &Address) -> u64 {
        self.balances.get(funder).copied().unwrap_or(0)
    }

    /// Sum of all shielded deposits
    pub fn claimable_total(&self) -> u64 {
        self.claimable_total
    }

    /// Sum of all payouts made through claims
    pub fn claimed_total(&self) -> u64 {
        self.claimed_total
    }

    /// Lifetime claimed amount of a funder
    pub fn claimed_by(&self, funder: &Address) -> u64 {
        self.claimed_by.get(funder).copied().unwrap_or(0)
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> CustodyPhase {
        self.phase
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
    fn test_deposits_shielded_only_while_funding() {
        let mut ledger = ShieldedCustodyLedger::new(None);

        assert!(ledger.deposit(addr(1), 100));
        assert_eq!(ledger.balance_of(&addr(1)), 100);
        assert_eq!(ledger.claimable_total(), 100);

        ledger.start_claim_window(1_000, 3_600).unwrap();

        // Not shielded once the window is armed
        assert!(!ledger.deposit(addr(2), 50));
        assert_eq!(ledger.balance_of(&addr(2)), 0);
        assert_eq!(ledger.claimable_total(), 100);
    }

    #[test]
    fn test_start_claim_window_once() {
        let mut ledger = ShieldedCustodyLedger::new(None);
        let deadline = ledger.start_claim_window(1_000, 3_600).unwrap();
        assert_eq!(deadline, 4_600);
        assert_eq!(ledger.phase(), CustodyPhase::WindowArmed { deadline: 4_600 });

        assert!(matches!(
            ledger.start_claim_window(2_000, 10),
            Err(LedgerError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_open_claims_respects_deadline() {
        let mut ledger = ShieldedCustodyLedger::new(None);

        // Nothing armed yet
        assert!(matches!(
            ledger.open_claims(1_000),
            Err(LedgerError::WindowStillOpen)
        ));

        ledger.start_claim_window(1_000, 3_600).unwrap();
        assert!(matches!(
            ledger.open_claims(4_599),
            Err(LedgerError::WindowStillOpen)
        ));

        // At the deadline exactly
        ledger.open_claims(4_600).unwrap();
        assert_eq!(
            ledger.phase(),
            CustodyPhase::ClaimsOpen {
                deadline: 4_600,
                opened_at: 4_600
            }
        );

        // A second open is rejected so opened_at can never move
        assert!(matches!(
            ledger.open_claims(5_000),
            Err(LedgerError::ClaimsAlreadyOpen)
        ));
    }

    #[test]
    fn test_pro_rata_multiplies_before_dividing() {
        let mut ledger = ShieldedCustodyLedger::new(None);
        ledger.deposit(addr(1), 100);
        ledger.deposit(addr(2), 300);
        ledger.start_claim_window(0, 0).unwrap();
        ledger.open_claims(0).unwrap();

        // 100/400 of 1000: division-first would truncate to 0
        let payout = ledger.claimable_payout(&addr(1), 0, 1_000).unwrap();
        assert_eq!(payout, 250);
    }

    #[test]
    fn test_claim_validation_order() {
        let mut ledger = ShieldedCustodyLedger::new(None);
        ledger.deposit(addr(1), 100);

        // Non-funder rejected before the phase check
        assert!(matches!(
            ledger.claimable_payout(&addr(9), 0, 100),
            Err(LedgerError::NotAFunder(_))
        ));

        // Funder but claims not open
        assert!(matches!(
            ledger.claimable_payout(&addr(1), 0, 100),
            Err(LedgerError::ClaimsNotOpen)
        ));
    }

    #[test]
    fn test_claim_eligibility_window() {
        let mut ledger = ShieldedCustodyLedger::new(Some(100));
        ledger.deposit(addr(1), 100);
        ledger.start_claim_window(0, 0).unwrap();
        ledger.open_claims(1_000).unwrap();

        // Eligible strictly before opened_at + eligibility
        assert!(ledger.claimable_payout(&addr(1), 1_099, 100).is_ok());
        assert!(matches!(
            ledger.claimable_payout(&addr(1), 1_100, 100),
            Err(LedgerError::ClaimWindowExpired)
        ));
    }

    #[test]
    fn test_record_claim_consumes_entitlement() {
        let mut ledger = ShieldedCustodyLedger::new(None);
        ledger.deposit(addr(1), 100);
        ledger.deposit(addr(2), 300);
        ledger.start_claim_window(0, 0).unwrap();
        ledger.open_claims(0).unwrap();

        let payout = ledger.claimable_payout(&addr(1), 0, 400).unwrap();
        assert_eq!(payout, 100);
        ledger.record_claim(addr(1), payout);

        assert_eq!(ledger.balance_of(&addr(1)), 0);
        assert_eq!(ledger.claimed_by(&addr(1)), 100);
        assert_eq!(ledger.claimed_total(), 100);

        // A second claim fails: the balance is gone
        assert!(matches!(
            ledger.claimable_payout(&addr(1), 0, 300),
            Err(LedgerError::NotAFunder(_))
        ));

        // The denominator stays fixed for the remaining funders
        assert_eq!(ledger.claimable_total(), 400);
        assert_eq!(ledger.claimable_payout(&addr(2), 0, 300).unwrap(), 225);
    }

    #[test]
    fn test_extreme_duration_saturates_deadline() {
        let mut ledger = ShieldedCustodyLedger::new(None);
        ledger.deposit(addr(1), 100);

        // "Claims effectively never": the deadline must not wrap into
        // the past
        let deadline = ledger.start_claim_window(1_000, u64::MAX).unwrap();
        assert_eq!(deadline, u64::MAX);
        assert!(matches!(
            ledger.open_claims(u64::MAX - 1),
            Err(LedgerError::WindowStillOpen)
        ));
    }

    #[test]
    fn test_extreme_eligibility_never_expires() {
        let mut ledger = ShieldedCustodyLedger::new(Some(u64::MAX));
        ledger.deposit(addr(1), 100);
        ledger.start_claim_window(0, 0).unwrap();
        ledger.open_claims(1_000).unwrap();

        assert!(ledger.claimable_payout(&addr(1), u64::MAX - 1, 100).is_ok());
    }

    #[test]
    fn test_deposit_totals_saturate() {
        let mut ledger = ShieldedCustodyLedger::new(None);
        ledger.deposit(addr(1), u64::MAX);
        ledger.deposit(addr(2), 100);

        assert_eq!(ledger.claimable_total(), u64::MAX);
        assert_eq!(ledger.balance_of(&addr(2)), 100);
    }

    #[test]
    fn test_pro_rata_large_values_do_not_overflow() {
        let mut ledger = ShieldedCustodyLedger::new(None);
        ledger.deposit(addr(1), u64::MAX / 2);
        ledger.deposit(addr(2), u64::MAX / 2);
        ledger.start_claim_window(0, 0).unwrap();
        ledger.open_claims(0).unwrap();

        let custody = u64::MAX - 1;
        let payout = ledger.claimable_payout(&addr(1), 0, custody).unwrap();
        assert_eq!(payout, custody / 2);
    }
}
