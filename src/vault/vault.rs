//! The vault facade
//!
//! Wires the owner registry, custody ledger and execution gateway
//! together behind one authorization protocol: every privileged state
//! change, outgoing transfers and governance alike, enters through
//! [`Vault::authorize`] with an off-chain-collected signature bundle.

use thiserror::Error;

use crate::core::{authorization_digest, Action, Address, GovernanceOp, VaultEvent};
use crate::crypto::{recover_signer, KeyError};
use crate::vault::config::VaultConfig;
use crate::vault::gateway::ExecutionGateway;
use crate::vault::ledger::{CustodyPhase, LedgerError, ShieldedCustodyLedger};
use crate::vault::owners::{OwnerError, OwnerRegistry};

/// Errors from vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Unauthorized caller: {0}")]
    Unauthorized(Address),
    #[error("Duplicate or unordered signature")]
    DuplicateOrUnorderedSignature,
    #[error("Insufficient signatures: have {have}, need {need}")]
    InsufficientSignatures { have: u32, need: u32 },
    #[error("Execution failed: {reason}")]
    ExecutionFailed { reason: String },
    #[error("Payout transfer rejected")]
    TransferFailed,
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
    #[error("Owner error: {0}")]
    OwnerError(#[from] OwnerError),
    #[error("Ledger error: {0}")]
    LedgerError(#[from] LedgerError),
}

/// Receipt for a successfully executed authorization
#[derive(Clone, Debug)]
pub struct AuthorizationReceipt {
    /// The nonce slot this authorization consumed
    pub nonce: u64,
    /// The digest the owners signed
    pub digest: [u8; 32],
    /// Data returned by the downstream call (empty for governance)
    pub return_data: Vec<u8>,
}

/// Receipt for an inbound deposit
#[derive(Clone, Debug)]
pub struct DepositReceipt {
    /// Whether the deposit was credited to the sender's funder balance
    pub shielded: bool,
    /// Total custody value after the deposit
    pub custody_total: u64,
}

/// The authorization and custody core
pub struct Vault<G: ExecutionGateway> {
    address: Address,
    chain_id: u64,
    owners: OwnerRegistry,
    ledger: ShieldedCustodyLedger,
    gateway: G,
    nonce: u64,
    custody_balance: u64,
    events: Vec<VaultEvent>,
}

impl<G: ExecutionGateway> Vault<G> {
    /// Construct a vault from its configuration
    pub fn new(config: VaultConfig, gateway: G) -> Result<Self, VaultError> {
        let owners = OwnerRegistry::new(config.owners, config.threshold)?;

        Ok(Self {
            address: config.vault_address,
            chain_id: config.chain_id,
            owners,
            ledger: ShieldedCustodyLedger::new(config.claim_eligibility),
            gateway,
            nonce: 0,
            custody_balance: 0,
            events: Vec::new(),
        })
    }

    // =========================================================================
    // Authorization protocol
    // =========================================================================

    /// Authorize and execute an action against the current nonce slot
    ///
    /// The caller must be an owner. Signatures must be supplied in
    /// strictly ascending order of their recovered signer addresses;
    /// that ordering is the deduplication mechanism. Once the signature
    /// set is accepted the nonce slot is consumed, even if the
    /// downstream execution or governance apply then fails; a rejected
    /// bundle before that point leaves no state behind.
    pub fn authorize(
        &mut self,
        caller: Address,
        action: Action,
        signatures: &[Vec<u8>],
        now: u64,
    ) -> Result<AuthorizationReceipt, VaultError> {
        if !self.owners.is_owner(&caller) {
            return Err(VaultError::Unauthorized(caller));
        }

        let digest = authorization_digest(&self.address, self.chain_id, self.nonce, &action);

        let mut valid: u32 = 0;
        let mut previous: Option<Address> = None;
        for signature in signatures {
            let signer = recover_signer(&digest, signature)?;
            if let Some(prev) = previous {
                if signer <= prev {
                    return Err(VaultError::DuplicateOrUnorderedSignature);
                }
            }
            previous = Some(signer);

            if self.owners.is_owner(&signer) {
                valid += 1;
            }
        }

        let need = self.owners.threshold();
        if valid < need {
            return Err(VaultError::InsufficientSignatures { have: valid, need });
        }

        // Signature set accepted: the slot is consumed from here on
        let nonce = self.nonce;
        self.nonce += 1;

        let result = self.dispatch(caller, &action, now);
        let (success, return_data) = match &result {
            Ok(data) => (true, data.clone()),
            Err(_) => (false, Vec::new()),
        };
        self.events.push(VaultEvent::Authorization {
            caller,
            action,
            nonce,
            digest: hex::encode(digest),
            success,
            return_data: hex::encode(&return_data),
        });

        let return_data = result?;
        log::info!("action authorized at nonce {} by {}", nonce, caller);
        Ok(AuthorizationReceipt {
            nonce,
            digest,
            return_data,
        })
    }

    /// Execute an accepted action
    fn dispatch(
        &mut self,
        caller: Address,
        action: &Action,
        now: u64,
    ) -> Result<Vec<u8>, VaultError> {
        match action {
            Action::Transfer { to, value, payload } => {
                if *value > self.custody_balance {
                    return Err(VaultError::ExecutionFailed {
                        reason: format!(
                            "insufficient custody: have {}, need {}",
                            self.custody_balance, value
                        ),
                    });
                }

                let outcome = self.gateway.execute(*to, *value, payload);
                if !outcome.success {
                    return Err(VaultError::ExecutionFailed {
                        reason: "call rejected by gateway".to_string(),
                    });
                }

                self.custody_balance -= value;
                Ok(outcome.return_data)
            }
            Action::Governance(op) => {
                self.apply_governance(caller, op, now)?;
                Ok(Vec::new())
            }
        }
    }

    /// Apply a threshold-approved governance operation
    fn apply_governance(
        &mut self,
        caller: Address,
        op: &GovernanceOp,
        now: u64,
    ) -> Result<(), VaultError> {
        match *op {
            GovernanceOp::AddOwner {
                owner,
                new_threshold,
            } => {
                self.owners.add_owner(owner, new_threshold)?;
                self.events.push(VaultEvent::OwnershipChange {
                    owner,
                    is_member: true,
                });
            }
            GovernanceOp::RemoveOwner {
                owner,
                new_threshold,
            } => {
                self.owners.remove_owner(owner, new_threshold)?;
                self.events.push(VaultEvent::OwnershipChange {
                    owner,
                    is_member: false,
                });
            }
            GovernanceOp::SetThreshold { new_threshold } => {
                self.owners.set_threshold(new_threshold)?;
            }
            GovernanceOp::StartClaimWindow { duration } => {
                let deadline = self.ledger.start_claim_window(now, duration)?;
                self.events.push(VaultEvent::WindowStart {
                    initiator: caller,
                    started_at: now,
                    duration,
                    deadline,
                });
                log::info!("claim window armed, deadline {}", deadline);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Custody operations
    // =========================================================================

    /// Record an inbound value transfer
    pub fn deposit(&mut self, sender: Address, amount: u64) -> DepositReceipt {
        self.custody_balance = self.custody_balance.saturating_add(amount);
        let shielded = self.ledger.deposit(sender, amount);

        self.events.push(VaultEvent::Deposit {
            sender,
            amount,
            shielded,
            custody_total: self.custody_balance,
        });

        DepositReceipt {
            shielded,
            custody_total: self.custody_balance,
        }
    }

    /// Open claims once the armed deadline has passed; callable by anyone
    pub fn open_claims(&mut self, caller: Address, now: u64) -> Result<(), VaultError> {
        self.ledger.open_claims(now)?;
        self.events.push(VaultEvent::ClaimsOpened {
            initiator: caller,
            opened_at: now,
        });
        log::info!("claims opened at {} by {}", now, caller);
        Ok(())
    }

    /// Withdraw the caller's pro-rata share of the current custody value
    ///
    /// The payout is computed read-only first and the entitlement is
    /// consumed only after the gateway accepts the transfer, so a
    /// rejected transfer leaves the funder's balance intact.
    pub fn claim(
        &mut self,
        caller: Address,
        payout_to: Address,
        now: u64,
    ) -> Result<u64, VaultError> {
        let payout = self
            .ledger
            .claimable_payout(&caller, now, self.custody_balance)?;

        if !self.gateway.transfer(payout_to, payout) {
            return Err(VaultError::TransferFailed);
        }

        self.custody_balance -= payout;
        self.ledger.record_claim(caller, payout);

        self.events.push(VaultEvent::Claim {
            funder: caller,
            payout_to,
            amount: payout,
        });
        Ok(payout)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// The digest off-chain signers must sign to approve `action`
    /// against the current nonce slot
    pub fn digest_for(&self, action: &Action) -> [u8; 32] {
        authorization_digest(&self.address, self.chain_id, self.nonce, action)
    }

    /// Check owner membership
    pub fn is_owner(&self, identity: &Address) -> bool {
        self.owners.is_owner(identity)
    }

    /// Current owners in ascending address order
    pub fn owners(&self) -> Vec<Address> {
        self.owners.owners()
    }

    /// Current signature threshold
    pub fn threshold(&self) -> u32 {
        self.owners.threshold()
    }

    /// Next unconsumed nonce slot
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Total custody value held
    pub fn custody_balance(&self) -> u64 {
        self.custody_balance
    }

    /// Shielded balance of a funder
    pub fn shielded_balance_of(&self, funder: &Address) -> u64 {
        self.ledger.balance_of(funder)
    }

    /// Sum of all shielded deposits
    pub fn claimable_total(&self) -> u64 {
        self.ledger.claimable_total()
    }

    /// Sum of all claim payouts made
    pub fn claimed_total(&self) -> u64 {
        self.ledger.claimed_total()
    }

    /// Lifetime claimed amount of a funder
    pub fn claimed_by(&self, funder: &Address) -> u64 {
        self.ledger.claimed_by(funder)
    }

    /// Current claim-window phase
    pub fn phase(&self) -> CustodyPhase {
        self.ledger.phase()
    }

    /// Network scope of this deployment
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The vault's own identity
    pub fn address(&self) -> Address {
        self.address
    }

    /// All records emitted so far, in order
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    /// The execution gateway
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Mutable access to the execution gateway
    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }
}
