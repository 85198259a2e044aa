//! Command-line interface for the off-chain signing workflow

pub mod commands;

pub use commands::{cmd_digest, cmd_keygen, cmd_recover, cmd_sign, CliResult};
