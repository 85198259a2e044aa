//! Vault CLI application
//!
//! Off-chain companion for the shielded vault: key generation, digest
//! computation, signing and signer recovery.

use clap::{Parser, Subcommand};
use shielded_vault::cli;
use shielded_vault::core::{Action, Address, GovernanceOp};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vault")]
#[command(version = "0.1.0")]
#[command(about = "Off-chain signing tools for the shielded custody vault", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new owner key pair
    Keygen,

    /// Compute the authorization digest for a pending action
    Digest {
        /// Vault config file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Nonce slot the action will consume
        #[arg(short, long)]
        nonce: u64,

        #[command(subcommand)]
        action: ActionArgs,
    },

    /// Sign a digest with a secret key
    Sign {
        /// Secret key (hex)
        #[arg(short, long)]
        key: String,

        /// Digest to sign (32 bytes, hex)
        #[arg(short, long)]
        digest: String,
    },

    /// Recover the signer address from a signature
    Recover {
        /// Digest that was signed (32 bytes, hex)
        #[arg(short, long)]
        digest: String,

        /// Signature (65 bytes, hex)
        #[arg(short, long)]
        signature: String,
    },
}

#[derive(Subcommand)]
enum ActionArgs {
    /// Outgoing value transfer
    Transfer {
        /// Destination address
        #[arg(short, long)]
        to: Address,

        /// Amount to send
        #[arg(short, long)]
        value: u64,

        /// Call payload (hex)
        #[arg(short, long)]
        payload: Option<String>,
    },

    /// Add an owner
    AddOwner {
        /// New owner's address
        #[arg(short, long)]
        owner: Address,

        /// New signature threshold
        #[arg(short, long)]
        threshold: u32,
    },

    /// Remove an owner
    RemoveOwner {
        /// Owner's address
        #[arg(short, long)]
        owner: Address,

        /// New signature threshold
        #[arg(short, long)]
        threshold: u32,
    },

    /// Change the signature threshold
    SetThreshold {
        /// New signature threshold
        #[arg(short, long)]
        threshold: u32,
    },

    /// Arm the claim window
    StartClaimWindow {
        /// Window duration in seconds
        #[arg(short, long)]
        duration: u64,
    },
}

impl ActionArgs {
    fn into_action(self) -> Result<Action, Box<dyn std::error::Error>> {
        Ok(match self {
            ActionArgs::Transfer { to, value, payload } => Action::Transfer {
                to,
                value,
                payload: match payload {
                    Some(hex_payload) => hex::decode(hex_payload)?,
                    None => Vec::new(),
                },
            },
            ActionArgs::AddOwner { owner, threshold } => {
                Action::Governance(GovernanceOp::AddOwner {
                    owner,
                    new_threshold: threshold,
                })
            }
            ActionArgs::RemoveOwner { owner, threshold } => {
                Action::Governance(GovernanceOp::RemoveOwner {
                    owner,
                    new_threshold: threshold,
                })
            }
            ActionArgs::SetThreshold { threshold } => {
                Action::Governance(GovernanceOp::SetThreshold {
                    new_threshold: threshold,
                })
            }
            ActionArgs::StartClaimWindow { duration } => {
                Action::Governance(GovernanceOp::StartClaimWindow { duration })
            }
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen => cli::cmd_keygen(),
        Commands::Digest {
            config,
            nonce,
            action,
        } => cli::cmd_digest(&config, nonce, &action.into_action()?),
        Commands::Sign { key, digest } => cli::cmd_sign(&key, &digest),
        Commands::Recover { digest, signature } => cli::cmd_recover(&digest, &signature),
    }
}
