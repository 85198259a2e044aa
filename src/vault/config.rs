//! Vault construction parameters
//!
//! `VaultConfig` carries everything fixed at construction time and can
//! be saved to / loaded from a JSON file, so off-chain signing tools and
//! the host share one description of the deployment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

use crate::core::Address;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Construction parameters for a vault
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultConfig {
    /// The vault's own identity, mixed into every authorization digest
    pub vault_address: Address,
    /// Network scope, prevents cross-network signature replay
    pub chain_id: u64,
    /// Initial owner set
    pub owners: Vec<Address>,
    /// Minimum distinct valid owner signatures per authorization
    pub threshold: u32,
    /// How long claims stay eligible after opening, in seconds;
    /// `None` means claims never expire
    #[serde(default)]
    pub claim_eligibility: Option<u64>,
}

impl VaultConfig {
    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Save the configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    fn sample_config() -> VaultConfig {
        VaultConfig {
            vault_address: KeyPair::generate().address(),
            chain_id: 7,
            owners: (0..3).map(|_| KeyPair::generate().address()).collect(),
            threshold: 2,
            claim_eligibility: Some(86_400),
        }
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");

        let config = sample_config();
        config.save(&path).unwrap();

        let loaded = VaultConfig::from_file(&path).unwrap();
        assert_eq!(loaded.vault_address, config.vault_address);
        assert_eq!(loaded.chain_id, 7);
        assert_eq!(loaded.owners, config.owners);
        assert_eq!(loaded.threshold, 2);
        assert_eq!(loaded.claim_eligibility, Some(86_400));
    }

    #[test]
    fn test_claim_eligibility_defaults_to_none() {
        let config = sample_config();
        let mut value = serde_json::to_value(&config).unwrap();
        value.as_object_mut().unwrap().remove("claim_eligibility");

        let loaded: VaultConfig = serde_json::from_value(value).unwrap();
        assert_eq!(loaded.claim_eligibility, None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = VaultConfig::from_file("/nonexistent/vault.json");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
