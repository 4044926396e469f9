// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Master Key Material
//!
//! The envelope service holds one long-lived 32-byte master key. The key is
//! either injected by the caller or generated on the spot; its lifecycle and
//! storage belong to the caller.
//!
//! ## Security Considerations
//!
//! - Keys can be read from an environment variable as 64 hex characters,
//!   optionally with a "0x" prefix
//! - Key is NEVER logged or persisted
//! - `Debug` output is redacted
//!
//! ## Usage
//!
//! ```no_run
//! use record_envelope::crypto::MasterKey;
//!
//! let key = MasterKey::from_env("RECORD_ENVELOPE_MASTER_KEY")?;
//! assert_eq!(key.to_hex().len(), 64);
//! # Ok::<(), record_envelope::crypto::CryptoError>(())
//! ```

use crate::crypto::aead::{random_bytes, KEY_SIZE};
use crate::crypto::error::{CryptoError, Result};
use std::env;
use std::fmt;
use tracing::info;

/// 32-byte AES-256 master key
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey([u8; KEY_SIZE]);

impl MasterKey {
    /// Generate a new random master key
    pub fn generate() -> Self {
        MasterKey(random_bytes::<KEY_SIZE>())
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        MasterKey(bytes)
    }

    /// Build from a slice, which must be exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            CryptoError::invalid_key(
                "master_key",
                format!("expected {} bytes, got {}", KEY_SIZE, bytes.len()),
            )
        })?;
        Ok(MasterKey(array))
    }

    /// Parse 64 hex characters, with or without a "0x" prefix
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let hex_str = hex_str.trim();
        let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);

        if hex_str.len() != KEY_SIZE * 2 {
            return Err(CryptoError::invalid_key(
                "master_key",
                format!(
                    "must be exactly {} hex characters ({} bytes), got {} characters",
                    KEY_SIZE * 2,
                    KEY_SIZE,
                    hex_str.len()
                ),
            ));
        }

        let bytes = hex::decode(hex_str).map_err(|e| {
            CryptoError::invalid_key("master_key", format!("invalid hex characters: {}", e))
        })?;
        Self::from_slice(&bytes)
    }

    /// Load a master key from the environment variable `var`
    ///
    /// # Errors
    ///
    /// - Variable not set or empty
    /// - Value is not 64 hex characters
    pub fn from_env(var: &str) -> Result<Self> {
        let value = env::var(var).map_err(|_| CryptoError::InvalidConfig {
            field: var.to_string(),
            reason: "environment variable not set".to_string(),
        })?;

        if value.trim().is_empty() {
            return Err(CryptoError::InvalidConfig {
                field: var.to_string(),
                reason: "environment variable is empty".to_string(),
            });
        }

        let key = Self::from_hex(&value)?;

        // Log success WITHOUT logging the actual key
        info!("Master key loaded from {} ({} bytes)", var, KEY_SIZE);

        Ok(key)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}
