//! CLI command handlers
//!
//! Implements the off-chain signing workflow: generate owner keys,
//! compute the exact digest a pending action binds to, sign it, and
//! recover the signer from a signature to verify a bundle by hand.

use std::path::Path;

use crate::core::{authorization_digest, Action};
use crate::crypto::{recover_signer, KeyPair, SIGNATURE_LENGTH};
use crate::vault::VaultConfig;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Generate a new owner key pair
pub fn cmd_keygen() -> CliResult<()> {
    let key_pair = KeyPair::generate();

    println!("🔐 New key pair generated!");
    println!("   📍 Address:    {}", key_pair.address());
    println!("   🔑 Public key: {}", key_pair.public_key_hex());
    println!("   🗝️  Secret key: {}", key_pair.secret_hex());
    println!("\n   ⚠️  Keep the secret key private. Anyone holding it can");
    println!("   co-sign vault actions as this owner.");

    Ok(())
}

/// Compute the authorization digest for a pending action
///
/// Reads the deployment description from the config file so the digest
/// is bound to the right vault address and chain id.
pub fn cmd_digest(config_path: &Path, nonce: u64, action: &Action) -> CliResult<()> {
    let config = VaultConfig::from_file(config_path)?;
    let digest = authorization_digest(&config.vault_address, config.chain_id, nonce, action);

    println!("📝 Authorization digest");
    println!("   Vault:    {}", config.vault_address);
    println!("   Chain id: {}", config.chain_id);
    println!("   Nonce:    {}", nonce);
    println!("   Action:   {}", serde_json::to_string(action)?);
    println!("\n   Digest: {}", hex::encode(digest));
    println!("   Sign these exact bytes with: vault sign --key <secret> --digest <hex>");

    Ok(())
}

/// Sign a digest with a secret key
pub fn cmd_sign(secret_hex: &str, digest_hex: &str) -> CliResult<()> {
    let key_pair = KeyPair::from_secret_hex(secret_hex)?;
    let digest = parse_digest(digest_hex)?;

    let signature = key_pair.sign_recoverable(&digest);

    println!("✍️  Signed as {}", key_pair.address());
    println!("   Signature: {}", hex::encode(signature));

    Ok(())
}

/// Recover the signer address from a digest and signature
pub fn cmd_recover(digest_hex: &str, signature_hex: &str) -> CliResult<()> {
    let digest = parse_digest(digest_hex)?;
    let signature = hex::decode(signature_hex)?;
    if signature.len() != SIGNATURE_LENGTH {
        return Err(format!(
            "signature must be {} bytes, got {}",
            SIGNATURE_LENGTH,
            signature.len()
        )
        .into());
    }

    let signer = recover_signer(&digest, &signature)?;

    println!("🔎 Recovered signer: {}", signer);

    Ok(())
}

fn parse_digest(digest_hex: &str) -> CliResult<[u8; 32]> {
    let bytes = hex::decode(digest_hex)?;
    if bytes.len() != 32 {
        return Err(format!("digest must be 32 bytes, got {}", bytes.len()).into());
    }
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&bytes);
    Ok(digest)
}
