// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ed25519 Backend
//!
//! EdDSA signing only. The private key is the 32-byte seed, the public key
//! the 32-byte compressed Edwards point, signatures are 64 bytes.

use super::{CurveBackend, CurveKind, KeyPair};
use crate::crypto::aead::random_bytes;
use crate::crypto::error::{CryptoError, Result};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// ed25519 implementation of [`CurveBackend`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Backend;

fn parse_signing_key(private_key: &[u8]) -> Result<SigningKey> {
    let seed: [u8; 32] = private_key.try_into().map_err(|_| {
        CryptoError::invalid_key(
            "ed25519_private_key",
            format!("expected 32 bytes, got {}", private_key.len()),
        )
    })?;
    Ok(SigningKey::from_bytes(&seed))
}

fn parse_verifying_key(public_key: &[u8]) -> Result<VerifyingKey> {
    let bytes: [u8; 32] = public_key.try_into().map_err(|_| {
        CryptoError::invalid_key(
            "ed25519_public_key",
            format!("expected 32 bytes, got {}", public_key.len()),
        )
    })?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| CryptoError::invalid_key("ed25519_public_key", e.to_string()))
}

impl Ed25519Backend {
    fn try_verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
        let verifying_key = parse_verifying_key(public_key)?;
        let signature = Signature::from_slice(signature)
            .map_err(|e| CryptoError::invalid_key("ed25519_signature", e.to_string()))?;

        Ok(verifying_key.verify(data, &signature).is_ok())
    }
}

impl CurveBackend for Ed25519Backend {
    fn kind(&self) -> CurveKind {
        CurveKind::Ed25519
    }

    fn generate_key_pair(&self) -> Result<KeyPair> {
        let seed = random_bytes::<32>();
        let signing_key = SigningKey::from_bytes(&seed);

        Ok(KeyPair {
            public_key: signing_key.verifying_key().to_bytes().to_vec(),
            private_key: seed.to_vec(),
            curve: CurveKind::Ed25519,
        })
    }

    fn derive_public_key(&self, private_key: &[u8]) -> Result<Vec<u8>> {
        let signing_key = parse_signing_key(private_key)?;
        Ok(signing_key.verifying_key().to_bytes().to_vec())
    }

    fn is_valid_public_key(&self, public_key: &[u8]) -> bool {
        parse_verifying_key(public_key).is_ok()
    }

    fn sign(&self, data: &[u8], private_key: &[u8]) -> Result<Vec<u8>> {
        let signing_key = parse_signing_key(private_key)?;
        let signature = signing_key
            .try_sign(data)
            .map_err(|e| CryptoError::encryption("eddsa_sign", e.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        self.try_verify(data, signature, public_key).unwrap_or(false)
    }

    fn shared_secret(&self, _private_key: &[u8], _public_key: &[u8]) -> Result<[u8; 32]> {
        Err(CryptoError::unsupported("key_agreement", CurveKind::Ed25519))
    }
}
