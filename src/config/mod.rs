// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service Configuration
//!
//! Selects the curve for the asymmetric service and optionally supplies the
//! master key for the envelope service. Values come from the environment or
//! from a TOML file:
//!
//! ```toml
//! curve = "secp256k1"
//! master_key = "0x1234...cdef"   # 64 hex characters, optional
//! ```

use crate::crypto::{
    AsymmetricEncryptionService, CryptoError, CurveKind, EnvelopeEncryptionService, MasterKey,
    Result,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{info, warn};

/// Environment variable selecting the curve
pub const CURVE_ENV: &str = "RECORD_ENVELOPE_CURVE";
/// Environment variable holding the hex master key
pub const MASTER_KEY_ENV: &str = "RECORD_ENVELOPE_MASTER_KEY";

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CryptoConfig {
    #[serde(default)]
    pub curve: CurveKind,
    /// Hex-encoded 32-byte master key
    #[serde(default)]
    pub master_key: Option<String>,
}

// master_key must not end up in logs
impl std::fmt::Debug for CryptoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoConfig")
            .field("curve", &self.curve)
            .field("master_key", &self.master_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CryptoConfig {
    /// Read `RECORD_ENVELOPE_CURVE` and `RECORD_ENVELOPE_MASTER_KEY`
    ///
    /// Unset variables fall back to the defaults (secp256k1, generated key).
    pub fn from_env() -> Result<Self> {
        let curve = match env::var(CURVE_ENV) {
            Ok(value) => value.parse::<CurveKind>()?,
            Err(_) => CurveKind::default(),
        };

        let master_key = env::var(MASTER_KEY_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self { curve, master_key })
    }

    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| CryptoError::InvalidConfig {
            field: "toml".to_string(),
            reason: e.to_string(),
        })
    }

    /// Load a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!("Loaded crypto config from {} (curve: {})", path.display(), config.curve);
        Ok(config)
    }

    pub fn asymmetric_service(&self) -> AsymmetricEncryptionService {
        AsymmetricEncryptionService::new(self.curve)
    }

    /// Build the envelope service, generating a master key when none is set
    pub fn envelope_service(&self) -> Result<EnvelopeEncryptionService> {
        match &self.master_key {
            Some(hex_key) => {
                let master_key =
                    MasterKey::from_hex(hex_key).map_err(|e| CryptoError::InvalidConfig {
                        field: "master_key".to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(EnvelopeEncryptionService::new(master_key))
            }
            None => {
                warn!("No master key configured, generating one; store it or lose the data");
                Ok(EnvelopeEncryptionService::generate())
            }
        }
    }
}
