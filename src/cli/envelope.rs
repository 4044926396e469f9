// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use crate::config::{CryptoConfig, MASTER_KEY_ENV};
use crate::crypto::EnvelopeEncryptionService;

/// Arguments for derive-key command
#[derive(Args, Debug)]
pub struct DeriveKeyArgs {
    /// Seed, typically a record identifier
    #[arg(long)]
    pub seed: String,

    /// Context separating key purposes
    #[arg(long, default_value = "record")]
    pub context: String,
}

/// Arguments for wrap command
#[derive(Args, Debug)]
pub struct WrapArgs {
    /// Key to wrap (hex)
    #[arg(long)]
    pub key: String,
}

/// Arguments for unwrap command
#[derive(Args, Debug)]
pub struct UnwrapArgs {
    /// Wrapped key envelope as printed by wrap
    #[arg(long)]
    pub envelope: String,
}

/// Envelope service for a configured master key
///
/// Each CLI invocation is a separate process, so a generated master key would
/// be gone before anything wrapped under it could be unwrapped.
fn configured_service(config: &CryptoConfig) -> Result<EnvelopeEncryptionService> {
    if config.master_key.is_none() {
        bail!(
            "no master key configured; pass --master-key, set {} or create one with master-keygen",
            MASTER_KEY_ENV
        );
    }
    Ok(config.envelope_service()?)
}

/// Print a fresh master key for later use with --master-key
pub fn master_keygen() -> Result<String> {
    let service = EnvelopeEncryptionService::generate();
    info!("Generated master key; store it securely");
    Ok(service.master_key_hex())
}

pub fn derive_key(config: &CryptoConfig, args: &DeriveKeyArgs) -> Result<String> {
    let service = configured_service(config)?;
    info!("Deriving key for context '{}'", args.context);
    Ok(service.generate_deterministic_key(&args.seed, &args.context))
}

pub fn wrap(config: &CryptoConfig, args: &WrapArgs) -> Result<String> {
    let service = configured_service(config)?;
    let key = args.key.trim();
    let key = hex::decode(key.strip_prefix("0x").unwrap_or(key)).context("key is not valid hex")?;
    Ok(service.encrypt_key(&key)?)
}

pub fn unwrap(config: &CryptoConfig, args: &UnwrapArgs) -> Result<String> {
    let service = configured_service(config)?;
    let key = service.decrypt_key(&args.envelope)?;
    Ok(hex::encode(key))
}
