//! Owner registry
//!
//! Tracks the set of authorized owners and the signature threshold.
//! Mutations are reachable only through the authorizer's governance
//! dispatch; nothing outside the vault can call them directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::core::Address;

/// Errors from owner-set governance
#[derive(Error, Debug)]
pub enum OwnerError {
    #[error("Invalid identity: the null address cannot be an owner")]
    InvalidIdentity,
    #[error("Duplicate owner: {0}")]
    DuplicateOwner(Address),
    #[error("Not an owner: {0}")]
    NotAnOwner(Address),
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
}

/// The set of authorized owners and the signature threshold
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OwnerRegistry {
    owners: BTreeSet<Address>,
    threshold: u32,
}

impl OwnerRegistry {
    /// Create a registry from the initial owner list
    ///
    /// Rejects the null identity, duplicate owners, a zero threshold,
    /// and a threshold above the owner count. The last guard is
    /// construction-only: deploying a vault that can never authorize
    /// anything is always a mistake.
    pub fn new(initial_owners: Vec<Address>, threshold: u32) -> Result<Self, OwnerError> {
        if threshold == 0 {
            return Err(OwnerError::InvalidThreshold(
                "threshold must be at least 1".to_string(),
            ));
        }
        if threshold as usize > initial_owners.len() {
            return Err(OwnerError::InvalidThreshold(format!(
                "threshold {} exceeds owner count {}",
                threshold,
                initial_owners.len()
            )));
        }

        let mut owners = BTreeSet::new();
        for owner in initial_owners {
            if owner.is_zero() {
                return Err(OwnerError::InvalidIdentity);
            }
            if !owners.insert(owner) {
                return Err(OwnerError::DuplicateOwner(owner));
            }
        }

        Ok(Self { owners, threshold })
    }

    /// Add an owner and update the threshold atomically
    pub fn add_owner(&mut self, owner: Address, new_threshold: u32) -> Result<(), OwnerError> {
        if owner.is_zero() {
            return Err(OwnerError::InvalidIdentity);
        }
        if self.owners.contains(&owner) {
            return Err(OwnerError::DuplicateOwner(owner));
        }
        if new_threshold == 0 {
            return Err(OwnerError::InvalidThreshold(
                "threshold must be at least 1".to_string(),
            ));
        }

        self.owners.insert(owner);
        self.threshold = new_threshold;
        Ok(())
    }

    /// Revoke an owner's membership and update the threshold atomically
    ///
    /// The threshold may end up above the remaining owner count; that is
    /// permitted (a product decision), but it leaves the vault unable to
    /// authorize anything ever again, so it is logged loudly.
    pub fn remove_owner(&mut self, owner: Address, new_threshold: u32) -> Result<(), OwnerError> {
        if !self.owners.contains(&owner) {
            return Err(OwnerError::NotAnOwner(owner));
        }
        if new_threshold == 0 {
            return Err(OwnerError::InvalidThreshold(
                "threshold must be at least 1".to_string(),
            ));
        }

        self.owners.remove(&owner);
        self.threshold = new_threshold;

        if self.threshold as usize > self.owners.len() {
            log::warn!(
                "threshold {} exceeds remaining owner count {}; no further action can be authorized",
                self.threshold,
                self.owners.len()
            );
        }
        Ok(())
    }

    /// Change the signature threshold
    pub fn set_threshold(&mut self, new_threshold: u32) -> Result<(), OwnerError> {
        if new_threshold == 0 {
            return Err(OwnerError::InvalidThreshold(
                "threshold must be at least 1".to_string(),
            ));
        }
        self.threshold = new_threshold;
        Ok(())
    }

    /// Check current membership
    pub fn is_owner(&self, identity: &Address) -> bool {
        self.owners.contains(identity)
    }

    /// Current signature threshold
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Number of current owners
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Current owners in ascending address order
    pub fn owners(&self) -> Vec<Address> {
        self.owners.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::address::ADDRESS_LENGTH;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; ADDRESS_LENGTH])
    }

    fn sample_registry() -> OwnerRegistry {
        OwnerRegistry::new(vec![addr(1), addr(2), addr(3)], 2).unwrap()
    }

    #[test]
    fn test_construction_validation() {
        // Zero threshold
        assert!(matches!(
            OwnerRegistry::new(vec![addr(1)], 0),
            Err(OwnerError::InvalidThreshold(_))
        ));

        // Threshold above owner count
        assert!(matches!(
            OwnerRegistry::new(vec![addr(1), addr(2)], 3),
            Err(OwnerError::InvalidThreshold(_))
        ));

        // Null identity
        assert!(matches!(
            OwnerRegistry::new(vec![addr(1), Address::ZERO], 1),
            Err(OwnerError::InvalidIdentity)
        ));

        // Duplicate owners
        assert!(matches!(
            OwnerRegistry::new(vec![addr(1), addr(1)], 1),
            Err(OwnerError::DuplicateOwner(_))
        ));
    }

    #[test]
    fn test_add_owner() {
        let mut registry = sample_registry();
        registry.add_owner(addr(4), 3).unwrap();
        assert!(registry.is_owner(&addr(4)));
        assert_eq!(registry.threshold(), 3);
        assert_eq!(registry.owner_count(), 4);

        assert!(matches!(
            registry.add_owner(addr(4), 3),
            Err(OwnerError::DuplicateOwner(_))
        ));
        assert!(matches!(
            registry.add_owner(Address::ZERO, 3),
            Err(OwnerError::InvalidIdentity)
        ));
        assert!(matches!(
            registry.add_owner(addr(5), 0),
            Err(OwnerError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_remove_owner() {
        let mut registry = sample_registry();
        registry.remove_owner(addr(3), 2).unwrap();
        assert!(!registry.is_owner(&addr(3)));
        assert_eq!(registry.owner_count(), 2);

        assert!(matches!(
            registry.remove_owner(addr(3), 1),
            Err(OwnerError::NotAnOwner(_))
        ));
        assert!(matches!(
            registry.remove_owner(addr(1), 0),
            Err(OwnerError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_remove_owner_may_exceed_remaining_count() {
        // Permitted, the vault is then permanently un-authorizable
        let mut registry = sample_registry();
        registry.remove_owner(addr(3), 3).unwrap();
        assert_eq!(registry.threshold(), 3);
        assert_eq!(registry.owner_count(), 2);
    }

    #[test]
    fn test_set_threshold() {
        let mut registry = sample_registry();
        registry.set_threshold(1).unwrap();
        assert_eq!(registry.threshold(), 1);

        assert!(matches!(
            registry.set_threshold(0),
            Err(OwnerError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_owners_sorted() {
        let registry = OwnerRegistry::new(vec![addr(3), addr(1), addr(2)], 1).unwrap();
        assert_eq!(registry.owners(), vec![addr(1), addr(2), addr(3)]);
    }
}
