// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! secp256k1 Backend
//!
//! ECDSA signatures (SHA-256 digest, DER encoding) and ECDH key agreement on
//! the curve used by Ethereum.
//!
//! Public keys are emitted as uncompressed SEC1 points (65 bytes). Compressed
//! points (33 bytes) are accepted wherever a public key is read.

use super::{CurveBackend, CurveKind, KeyPair};
use crate::crypto::aead::random_bytes;
use crate::crypto::error::{CryptoError, Result};
use k256::{
    ecdsa::{
        signature::{Signer, Verifier},
        Signature, SigningKey, VerifyingKey,
    },
    elliptic_curve::sec1::ToEncodedPoint,
    PublicKey, SecretKey,
};

/// Private scalar size
const PRIVATE_KEY_SIZE: usize = 32;

/// secp256k1 implementation of [`CurveBackend`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Backend;

fn parse_secret(private_key: &[u8]) -> Result<SecretKey> {
    if private_key.len() != PRIVATE_KEY_SIZE {
        return Err(CryptoError::invalid_key(
            "secp256k1_private_key",
            format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_SIZE,
                private_key.len()
            ),
        ));
    }

    SecretKey::from_slice(private_key)
        .map_err(|e| CryptoError::invalid_key("secp256k1_private_key", e.to_string()))
}

fn parse_public(public_key: &[u8]) -> Result<PublicKey> {
    // Supports both compressed (33 bytes) and uncompressed (65 bytes) formats
    if public_key.len() != 33 && public_key.len() != 65 {
        return Err(CryptoError::invalid_key(
            "secp256k1_public_key",
            format!("expected 33 or 65 bytes, got {}", public_key.len()),
        ));
    }

    PublicKey::from_sec1_bytes(public_key)
        .map_err(|e| CryptoError::invalid_key("secp256k1_public_key", e.to_string()))
}

fn encode_public(public_key: &PublicKey) -> Vec<u8> {
    public_key.to_encoded_point(false).as_bytes().to_vec()
}

impl Secp256k1Backend {
    fn try_verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
        let public = parse_public(public_key)?;
        let verifying_key = VerifyingKey::from(&public);
        let signature = Signature::from_der(signature)
            .map_err(|e| CryptoError::invalid_key("ecdsa_signature", e.to_string()))?;
        // k256 only verifies low-S; other signers may emit either half
        let signature = signature.normalize_s().unwrap_or(signature);

        Ok(verifying_key.verify(data, &signature).is_ok())
    }
}

impl CurveBackend for Secp256k1Backend {
    fn kind(&self) -> CurveKind {
        CurveKind::Secp256k1
    }

    fn generate_key_pair(&self) -> Result<KeyPair> {
        let private_bytes = random_bytes::<PRIVATE_KEY_SIZE>();
        let secret =
            SecretKey::from_slice(&private_bytes).map_err(|e| CryptoError::KeyGeneration {
                curve: CurveKind::Secp256k1,
                reason: e.to_string(),
            })?;

        Ok(KeyPair {
            public_key: encode_public(&secret.public_key()),
            private_key: secret.to_bytes().to_vec(),
            curve: CurveKind::Secp256k1,
        })
    }

    fn derive_public_key(&self, private_key: &[u8]) -> Result<Vec<u8>> {
        let secret = parse_secret(private_key)?;
        Ok(encode_public(&secret.public_key()))
    }

    fn is_valid_public_key(&self, public_key: &[u8]) -> bool {
        // Rejects off-curve points and the identity
        parse_public(public_key).is_ok()
    }

    fn sign(&self, data: &[u8], private_key: &[u8]) -> Result<Vec<u8>> {
        let secret = parse_secret(private_key)?;
        let signing_key = SigningKey::from(&secret);

        let signature: Signature = signing_key
            .try_sign(data)
            .map_err(|e| CryptoError::encryption("ecdsa_sign", e.to_string()))?;

        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        self.try_verify(data, signature, public_key).unwrap_or(false)
    }

    fn shared_secret(&self, private_key: &[u8], public_key: &[u8]) -> Result<[u8; 32]> {
        let secret = parse_secret(private_key)?;
        let public = parse_public(public_key)?;

        // shared_point = public * secret, keep the x-coordinate as-is
        let shared = k256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());

        let mut raw = [0u8; 32];
        raw.copy_from_slice(shared.raw_secret_bytes().as_slice());
        Ok(raw)
    }
}
