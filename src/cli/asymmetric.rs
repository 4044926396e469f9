// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::config::CryptoConfig;
use crate::crypto::{BinaryHybridPayload, HybridPayload, IV_SIZE, TAG_SIZE};

/// Arguments for encrypt command
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Recipient public key (hex)
    #[arg(long)]
    pub public_key: String,

    /// Text to encrypt
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,

    /// File to encrypt as binary data
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,

    /// Use the two-layer session key scheme for text
    #[arg(long)]
    pub large: bool,
}

/// Arguments for decrypt command
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Private key (hex)
    #[arg(long, env = "RECORD_ENVELOPE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Envelope JSON as printed by encrypt
    #[arg(long)]
    pub envelope: String,

    /// Envelope is a large-data payload
    #[arg(long, conflicts_with = "out")]
    pub large: bool,

    /// Envelope is a binary payload; write the plaintext to this file
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for sign command
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Private key (hex)
    #[arg(long, env = "RECORD_ENVELOPE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Data to sign
    #[arg(long)]
    pub data: String,
}

/// Arguments for verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Signer public key (hex)
    #[arg(long)]
    pub public_key: String,

    /// Signature (hex)
    #[arg(long)]
    pub signature: String,

    /// Signed data
    #[arg(long)]
    pub data: String,
}

/// Hex form of [`BinaryHybridPayload`] for printing
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinaryPayloadText {
    encrypted_data: String,
    encrypted_symmetric_key: String,
    iv: String,
    auth_tag: String,
}

impl From<&BinaryHybridPayload> for BinaryPayloadText {
    fn from(payload: &BinaryHybridPayload) -> Self {
        Self {
            encrypted_data: hex::encode(&payload.encrypted_data),
            encrypted_symmetric_key: payload.encrypted_symmetric_key.clone(),
            iv: hex::encode(payload.iv),
            auth_tag: hex::encode(payload.auth_tag),
        }
    }
}

impl TryFrom<BinaryPayloadText> for BinaryHybridPayload {
    type Error = anyhow::Error;

    fn try_from(text: BinaryPayloadText) -> Result<Self> {
        let iv: [u8; IV_SIZE] = hex::decode(&text.iv)?
            .try_into()
            .map_err(|_| anyhow!("iv must be {} bytes", IV_SIZE))?;
        let auth_tag: [u8; TAG_SIZE] = hex::decode(&text.auth_tag)?
            .try_into()
            .map_err(|_| anyhow!("authTag must be {} bytes", TAG_SIZE))?;

        Ok(Self {
            encrypted_data: hex::decode(&text.encrypted_data)?,
            encrypted_symmetric_key: text.encrypted_symmetric_key,
            iv,
            auth_tag,
        })
    }
}

fn decode_key(name: &str, value: &str) -> Result<Vec<u8>> {
    let value = value.trim();
    let value = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(value).with_context(|| format!("{} is not valid hex", name))
}

pub fn keygen(config: &CryptoConfig) -> Result<String> {
    let pair = config.asymmetric_service().generate_key_pair()?;
    info!("Generated {} key pair", pair.curve);

    let output = serde_json::json!({
        "curve": pair.curve,
        "publicKey": pair.public_key_hex(),
        "privateKey": pair.private_key_hex(),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn encrypt(config: &CryptoConfig, args: &EncryptArgs) -> Result<String> {
    let service = config.asymmetric_service();
    let public_key = decode_key("public key", &args.public_key)?;

    if let Some(path) = &args.file {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let payload = service.encrypt_binary_data(&data, &public_key)?;
        return Ok(serde_json::to_string(&BinaryPayloadText::from(&payload))?);
    }

    let data = args
        .data
        .as_deref()
        .ok_or_else(|| anyhow!("either --data or --file is required"))?;

    if args.large {
        let payload = service.encrypt_large_data(data.as_bytes(), &public_key)?;
        Ok(serde_json::to_string(&payload)?)
    } else {
        Ok(service.encrypt_with_public_key(data.as_bytes(), &public_key)?)
    }
}

pub fn decrypt(config: &CryptoConfig, args: &DecryptArgs) -> Result<String> {
    let service = config.asymmetric_service();
    let private_key = decode_key("private key", &args.private_key)?;

    if let Some(path) = &args.out {
        let text: BinaryPayloadText =
            serde_json::from_str(&args.envelope).context("Malformed binary payload")?;
        let payload = BinaryHybridPayload::try_from(text)?;
        let plaintext = service.decrypt_binary_data(&payload, &private_key)?;
        std::fs::write(path, &plaintext)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        return Ok(format!("Wrote {} bytes to {}", plaintext.len(), path.display()));
    }

    let plaintext = if args.large {
        let payload: HybridPayload =
            serde_json::from_str(&args.envelope).context("Malformed large-data payload")?;
        service.decrypt_large_data(&payload, &private_key)?
    } else {
        service.decrypt_with_private_key(&args.envelope, &private_key)?
    };

    String::from_utf8(plaintext).map_err(|_| anyhow!("Decrypted data is not valid UTF-8"))
}

pub fn sign(config: &CryptoConfig, args: &SignArgs) -> Result<String> {
    let private_key = decode_key("private key", &args.private_key)?;
    Ok(config
        .asymmetric_service()
        .sign(args.data.as_bytes(), &private_key)?)
}

pub fn verify(config: &CryptoConfig, args: &VerifyArgs) -> Result<String> {
    let public_key = decode_key("public key", &args.public_key)?;
    let valid = config
        .asymmetric_service()
        .verify(args.data.as_bytes(), &args.signature, &public_key);
    Ok(if valid { "valid" } else { "invalid" }.to_string())
}
