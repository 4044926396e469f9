// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Master-Key Envelope Encryption
//!
//! AES-256-GCM envelopes under a long-lived master key, or under any other
//! 32-byte key the caller supplies, plus HMAC-based derivation of per-record
//! keys that never need to be stored.
//!
//! ## Framings
//!
//! - Text: `{"iv": hex, "tag": hex, "encrypted": hex}`
//! - Binary: `iv (16) | tag (16) | ciphertext` in one buffer
//!
//! The text framing spells the field `tag`, unlike the `authTag` used by the
//! asymmetric service. Both spellings are part of the stored format.
//!
//! ## Deterministic keys
//!
//! ```text
//! key = hex(HMAC-SHA256(master_key, seed || ":" || context))
//! ```
//!
//! The same (master key, seed, context) always gives the same key. Never use
//! one (seed, context) pair for two different records.

use crate::crypto::aead::{self, AeadEnvelope, TagField, IV_SIZE};
use crate::crypto::error::{CryptoError, Result};
use crate::crypto::master_key::MasterKey;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Envelope encryption around one injected master key
///
/// The master key is fixed at construction; the service persists nothing.
#[derive(Debug, Clone)]
pub struct EnvelopeEncryptionService {
    master_key: MasterKey,
}

/// Builder for [`EnvelopeEncryptionService`]
#[derive(Debug, Default)]
pub struct EnvelopeServiceBuilder {
    master_key: Option<MasterKey>,
}

impl EnvelopeServiceBuilder {
    pub fn master_key(mut self, master_key: MasterKey) -> Self {
        self.master_key = Some(master_key);
        self
    }

    /// Use a hex-encoded master key
    pub fn master_key_hex(mut self, master_key_hex: &str) -> Result<Self> {
        self.master_key = Some(MasterKey::from_hex(master_key_hex)?);
        Ok(self)
    }

    /// Build the service, generating a master key if none was given
    pub fn build(self) -> EnvelopeEncryptionService {
        match self.master_key {
            Some(master_key) => EnvelopeEncryptionService::new(master_key),
            None => EnvelopeEncryptionService::generate(),
        }
    }
}

impl EnvelopeEncryptionService {
    pub fn new(master_key: MasterKey) -> Self {
        Self { master_key }
    }

    /// Create a service around a freshly generated master key
    ///
    /// Retrieve it with [`Self::master_key_hex`] and store it securely, or
    /// nothing encrypted under it can be recovered.
    pub fn generate() -> Self {
        debug!("Generated new master key");
        Self::new(MasterKey::generate())
    }

    pub fn builder() -> EnvelopeServiceBuilder {
        EnvelopeServiceBuilder::default()
    }

    /// Hex encoding of the master key (64 characters)
    pub fn master_key_hex(&self) -> String {
        self.master_key.to_hex()
    }

    /// Encrypt under the master key, `{iv, tag, encrypted}` framing
    pub fn encrypt(&self, data: &[u8]) -> Result<String> {
        self.encrypt_with_key(data, self.master_key.as_bytes())
    }

    /// Decrypt an envelope produced by [`Self::encrypt`]
    pub fn decrypt(&self, envelope: &str) -> Result<Vec<u8>> {
        self.open_text(envelope, self.master_key.as_bytes(), "decrypt")
    }

    /// Encrypt under any 32-byte key, `{iv, tag, encrypted}` framing
    pub fn encrypt_with_key(&self, data: &[u8], key: &[u8]) -> Result<String> {
        let envelope = aead::seal(key, data)?;
        Ok(envelope.to_text(TagField::Tag))
    }

    /// Decrypt an `{iv, tag, encrypted}` envelope with a caller-supplied key
    pub fn decrypt_with_key(&self, envelope: &str, key: &[u8]) -> Result<Vec<u8>> {
        self.open_text(envelope, key, "decrypt_with_key")
    }

    fn open_text(&self, envelope: &str, key: &[u8], operation: &str) -> Result<Vec<u8>> {
        let envelope = AeadEnvelope::from_text(envelope, TagField::Tag)
            .map_err(|_| CryptoError::decryption(operation))?;
        aead::open(key, &envelope).map_err(|_| CryptoError::decryption(operation))
    }

    /// Wrap a key under the master key
    pub fn encrypt_key(&self, key: &[u8]) -> Result<String> {
        debug!("Wrapping {}-byte key under master key", key.len());
        self.encrypt(key)
    }

    /// Unwrap a key produced by [`Self::encrypt_key`]
    ///
    /// Correctness rests on the AEAD tag; the length of the unwrapped key is
    /// not checked again.
    pub fn decrypt_key(&self, wrapped: &str) -> Result<Vec<u8>> {
        self.open_text(wrapped, self.master_key.as_bytes(), "decrypt_key")
    }

    /// Derive a per-record key from the master key
    ///
    /// Returns `hex(HMAC-SHA256(master_key, seed ":" context))`.
    pub fn generate_deterministic_key(&self, seed: &str, context: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.master_key.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(seed.as_bytes());
        mac.update(b":");
        mac.update(context.as_bytes());

        hex::encode(mac.finalize().into_bytes())
    }

    /// Encrypt to the `iv | tag | ciphertext` binary framing
    ///
    /// A random IV is drawn when `iv` is `None`. A supplied IV must never be
    /// reused with the same key.
    pub fn encrypt_binary(
        &self,
        data: &[u8],
        key: &[u8],
        iv: Option<[u8; IV_SIZE]>,
    ) -> Result<Vec<u8>> {
        let envelope = match iv {
            Some(iv) => aead::seal_with_iv(key, iv, data)?,
            None => aead::seal(key, data)?,
        };
        Ok(envelope.to_bytes())
    }

    /// Decrypt a buffer produced by [`Self::encrypt_binary`]
    ///
    /// Buffers shorter than 32 bytes are rejected.
    pub fn decrypt_binary(&self, combined: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        const OP: &str = "decrypt_binary";
        let envelope =
            AeadEnvelope::from_bytes(combined).map_err(|_| CryptoError::decryption(OP))?;
        aead::open(key, &envelope).map_err(|_| CryptoError::decryption(OP))
    }
}
