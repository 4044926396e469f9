// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod asymmetric;
pub mod envelope;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{CryptoConfig, CURVE_ENV, MASTER_KEY_ENV};
use crate::crypto::{hash_hex, CurveKind, RecordContent};

/// Record envelope CLI
#[derive(Parser, Debug)]
#[command(name = "record-envelope-cli")]
#[command(version = "0.1.0")]
#[command(about = "Encrypt, sign and hash records before storage", long_about = None)]
pub struct Cli {
    /// TOML config file (curve, master_key)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Curve for key and signature operations
    #[arg(long, global = true, env = CURVE_ENV)]
    pub curve: Option<CurveKind>,

    /// Hex master key for envelope operations
    #[arg(long, global = true, env = MASTER_KEY_ENV, hide_env_values = true)]
    pub master_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a key pair
    Keygen,

    /// Encrypt for a recipient public key
    Encrypt(asymmetric::EncryptArgs),

    /// Decrypt with a private key
    Decrypt(asymmetric::DecryptArgs),

    /// Sign data with a private key
    Sign(asymmetric::SignArgs),

    /// Verify a signature
    Verify(asymmetric::VerifyArgs),

    /// Generate a master key for the envelope commands
    MasterKeygen,

    /// Derive a per-record key from the master key
    DeriveKey(envelope::DeriveKeyArgs),

    /// Wrap a key under the master key
    Wrap(envelope::WrapArgs),

    /// Unwrap a key wrapped under the master key
    Unwrap(envelope::UnwrapArgs),

    /// SHA-256 content hash of a record
    Hash(HashArgs),
}

/// Arguments for the hash command
#[derive(clap::Args, Debug)]
pub struct HashArgs {
    /// Record text, or a JSON object when --json is set
    #[arg(long)]
    pub data: String,

    /// Treat --data as JSON (object keys are sorted before hashing)
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Merge the config file with command-line and environment overrides
    pub fn resolve_config(&self) -> Result<CryptoConfig> {
        let mut config = match &self.config {
            Some(path) => CryptoConfig::from_file(path)?,
            None => CryptoConfig::default(),
        };
        if let Some(curve) = self.curve {
            config.curve = curve;
        }
        if let Some(master_key) = self.master_key.as_ref().filter(|k| !k.trim().is_empty()) {
            config.master_key = Some(master_key.clone());
        }
        Ok(config)
    }
}

pub fn hash_record(args: &HashArgs) -> Result<String> {
    let content = if args.json {
        RecordContent::from_value(serde_json::from_str(&args.data)?)?
    } else {
        RecordContent::from(args.data.as_str())
    };
    Ok(hash_hex(&content))
}

/// Execute CLI command, returning what should be printed
pub fn execute(cli: Cli) -> Result<String> {
    let config = cli.resolve_config()?;

    match &cli.command {
        Commands::Keygen => asymmetric::keygen(&config),
        Commands::Encrypt(args) => asymmetric::encrypt(&config, args),
        Commands::Decrypt(args) => asymmetric::decrypt(&config, args),
        Commands::Sign(args) => asymmetric::sign(&config, args),
        Commands::Verify(args) => asymmetric::verify(&config, args),
        Commands::MasterKeygen => envelope::master_keygen(),
        Commands::DeriveKey(args) => envelope::derive_key(&config, args),
        Commands::Wrap(args) => envelope::wrap(&config, args),
        Commands::Unwrap(args) => envelope::unwrap(&config, args),
        Commands::Hash(args) => hash_record(args),
    }
}
