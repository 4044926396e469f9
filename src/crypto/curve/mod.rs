// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Curve Backends
//!
//! Key generation, signing and key agreement for the two supported curves:
//!
//! - **secp256k1**: ECDSA (DER signatures) and ECDH key agreement
//! - **ed25519**: EdDSA signatures only, there is no key agreement
//!
//! Both backends implement [`CurveBackend`]. A capability the curve does not
//! have returns `CryptoError::UnsupportedOperation` from the backend itself,
//! so services never branch on the curve.

mod ed25519;
mod secp256k1;

pub use ed25519::Ed25519Backend;
pub use secp256k1::Secp256k1Backend;

use crate::crypto::error::{CryptoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Curve a service is configured with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    #[default]
    Secp256k1,
    Ed25519,
}

impl CurveKind {
    /// Backend implementing this curve
    pub fn backend(self) -> &'static dyn CurveBackend {
        match self {
            CurveKind::Secp256k1 => &Secp256k1Backend,
            CurveKind::Ed25519 => &Ed25519Backend,
        }
    }

    /// Whether ECDH key agreement is defined for this curve
    pub fn supports_key_agreement(self) -> bool {
        matches!(self, CurveKind::Secp256k1)
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::Secp256k1 => write!(f, "secp256k1"),
            CurveKind::Ed25519 => write!(f, "ed25519"),
        }
    }
}

impl FromStr for CurveKind {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "secp256k1" => Ok(CurveKind::Secp256k1),
            "ed25519" => Ok(CurveKind::Ed25519),
            other => Err(CryptoError::InvalidConfig {
                field: "curve".to_string(),
                reason: format!("unknown curve '{}'", other),
            }),
        }
    }
}

/// Key pair produced by generation or derivation
///
/// The crate never stores key pairs; the caller owns them entirely.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub public_key: Vec<u8>,
    pub private_key: Vec<u8>,
    pub curve: CurveKind,
}

impl KeyPair {
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key)
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(&self.private_key)
    }
}

// Private key material must never reach logs
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .field("private_key", &"<redacted>")
            .field("curve", &self.curve)
            .finish()
    }
}

/// Capability set shared by both curves
pub trait CurveBackend: Send + Sync {
    /// Curve implemented by this backend
    fn kind(&self) -> CurveKind;

    /// Generate a fresh key pair from the OS CSPRNG
    fn generate_key_pair(&self) -> Result<KeyPair>;

    /// Derive the public key belonging to `private_key`
    fn derive_public_key(&self, private_key: &[u8]) -> Result<Vec<u8>>;

    /// Whether `public_key` parses into a usable point. Never fails.
    fn is_valid_public_key(&self, public_key: &[u8]) -> bool;

    /// Sign `data`, returning the curve's signature encoding
    fn sign(&self, data: &[u8], private_key: &[u8]) -> Result<Vec<u8>>;

    /// Check `signature` over `data`. Any parse or math failure is `false`.
    fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> bool;

    /// Raw ECDH shared value between `private_key` and `public_key`
    fn shared_secret(&self, private_key: &[u8], public_key: &[u8]) -> Result<[u8; 32]>;
}
