// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Asymmetric Hybrid Encryption
//!
//! Encrypts payloads for a recipient identified only by a public key.
//!
//! ## Protocol Flow
//!
//! 1. Generate a fresh ephemeral secp256k1 key pair (one per call)
//! 2. ECDH between the ephemeral private key and the recipient public key
//! 3. The raw 32-byte shared x-coordinate is the AES-256 key, no KDF
//! 4. AES-256-GCM with a random 16-byte IV
//! 5. Ship `{ephemeralPublicKey, iv, authTag, encrypted}` as hex JSON
//!
//! Large and binary payloads add one layer: a random 32-byte session key
//! encrypts the payload, and only the session key goes through steps 1-5.
//! Decryption must unwrap the session key first.
//!
//! ## Key derivation compatibility
//!
//! Step 3 deliberately skips HKDF. Stored envelopes can only be opened if the
//! shared value is used byte-for-byte as the AES key; adding a KDF requires a
//! new envelope version.
//!
//! ## Curve support
//!
//! Key agreement only exists on secp256k1. On an ed25519 service every
//! encryption and decryption call fails with `UnsupportedOperation` before
//! any input is inspected; signing and key management work on both curves.

use crate::crypto::aead::{
    self, random_bytes, AeadEnvelope, TagField, IV_SIZE, KEY_SIZE, TAG_SIZE,
};
use crate::crypto::curve::{CurveBackend, CurveKind, KeyPair};
use crate::crypto::error::{CryptoError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Envelope produced by [`AsymmetricEncryptionService::encrypt_with_public_key`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsymmetricEnvelope {
    /// One-time public key used for key agreement
    pub ephemeral_public_key: Vec<u8>,
    pub aead: AeadEnvelope,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AsymmetricEnvelopeText {
    ephemeral_public_key: String,
    iv: String,
    auth_tag: String,
    encrypted: String,
}

impl AsymmetricEnvelope {
    /// Render as `{ephemeralPublicKey, iv, authTag, encrypted}`
    pub fn to_text(&self) -> String {
        let text = AsymmetricEnvelopeText {
            ephemeral_public_key: hex::encode(&self.ephemeral_public_key),
            iv: hex::encode(self.aead.iv),
            auth_tag: hex::encode(self.aead.tag),
            encrypted: hex::encode(&self.aead.ciphertext),
        };
        serde_json::to_string(&text).unwrap_or_default()
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let malformed = || CryptoError::decryption("parse_envelope");

        let parsed: AsymmetricEnvelopeText =
            serde_json::from_str(text).map_err(|_| malformed())?;

        Ok(AsymmetricEnvelope {
            ephemeral_public_key: hex::decode(&parsed.ephemeral_public_key)
                .map_err(|_| malformed())?,
            aead: AeadEnvelope::from_hex_fields(&parsed.iv, &parsed.auth_tag, &parsed.encrypted)?,
        })
    }
}

/// Two-layer envelope for large text payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridPayload {
    /// `{iv, authTag, encrypted}` under the session key
    pub encrypted_data: String,
    /// Asymmetric envelope wrapping the session key
    pub encrypted_symmetric_key: String,
}

/// Two-layer envelope for raw byte payloads
///
/// Fields stay separate; the caller transports all four together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryHybridPayload {
    pub encrypted_data: Vec<u8>,
    pub encrypted_symmetric_key: String,
    pub iv: [u8; IV_SIZE],
    pub auth_tag: [u8; TAG_SIZE],
}

/// Turn the raw ECDH x-coordinate into the AES-256 key
///
/// The shared value is used directly. Do not replace this with a KDF without
/// bumping the envelope version.
fn aes_key_from_shared_secret(shared: [u8; 32]) -> [u8; KEY_SIZE] {
    shared
}

/// Hybrid encryption and signatures over one configured curve
///
/// Holds no state besides the curve, so one instance can serve concurrent
/// callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsymmetricEncryptionService {
    curve: CurveKind,
}

impl AsymmetricEncryptionService {
    pub fn new(curve: CurveKind) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> CurveKind {
        self.curve
    }

    fn backend(&self) -> &'static dyn CurveBackend {
        self.curve.backend()
    }

    /// Backend for an operation that needs key agreement
    fn key_agreement(&self, operation: &str) -> Result<&'static dyn CurveBackend> {
        if !self.curve.supports_key_agreement() {
            warn!("Rejected {} on {} service", operation, self.curve);
            return Err(CryptoError::unsupported(operation, self.curve));
        }
        Ok(self.backend())
    }

    pub fn generate_key_pair(&self) -> Result<KeyPair> {
        self.backend().generate_key_pair()
    }

    pub fn derive_public_key(&self, private_key: &[u8]) -> Result<Vec<u8>> {
        self.backend().derive_public_key(private_key)
    }

    /// Never fails; anything that does not parse is `false`
    pub fn is_valid_public_key(&self, public_key: &[u8]) -> bool {
        self.backend().is_valid_public_key(public_key)
    }

    /// Sign `data`, returning the hex-encoded signature
    ///
    /// secp256k1 signatures are DER-encoded ECDSA, ed25519 signatures are the
    /// raw 64 bytes.
    pub fn sign(&self, data: &[u8], private_key: &[u8]) -> Result<String> {
        let signature = self.backend().sign(data, private_key)?;
        debug!("Signed {} bytes with {}", data.len(), self.curve);
        Ok(hex::encode(signature))
    }

    /// Check a hex-encoded signature. Never fails.
    pub fn verify(&self, data: &[u8], signature_hex: &str, public_key: &[u8]) -> bool {
        match hex::decode(signature_hex) {
            Ok(signature) => self.backend().verify(data, &signature, public_key),
            Err(_) => false,
        }
    }

    /// Encrypt `data` for `recipient_public_key`, returning the typed envelope
    pub fn seal_for(
        &self,
        data: &[u8],
        recipient_public_key: &[u8],
    ) -> Result<AsymmetricEnvelope> {
        let backend = self.key_agreement("encrypt_with_public_key")?;

        if !backend.is_valid_public_key(recipient_public_key) {
            warn!(
                "Rejected recipient public key ({} bytes)",
                recipient_public_key.len()
            );
            return Err(CryptoError::invalid_key(
                "recipient_public_key",
                format!("not a valid {} public key", self.curve),
            ));
        }

        let ephemeral = backend.generate_key_pair()?;
        let shared = backend.shared_secret(&ephemeral.private_key, recipient_public_key)?;
        let key = aes_key_from_shared_secret(shared);

        let aead = aead::seal(&key, data)?;
        debug!("Encrypted {} bytes with public key", data.len());

        Ok(AsymmetricEnvelope {
            ephemeral_public_key: ephemeral.public_key,
            aead,
        })
    }

    /// Decrypt a typed envelope with the recipient's private key
    pub fn open_with(
        &self,
        envelope: &AsymmetricEnvelope,
        private_key: &[u8],
    ) -> Result<Vec<u8>> {
        const OP: &str = "decrypt_with_private_key";
        let backend = self.key_agreement(OP)?;

        let shared = backend
            .shared_secret(private_key, &envelope.ephemeral_public_key)
            .map_err(|_| CryptoError::decryption(OP))?;
        let key = aes_key_from_shared_secret(shared);

        aead::open(&key, &envelope.aead).map_err(|_| CryptoError::decryption(OP))
    }

    /// Encrypt `data` for `recipient_public_key` as a JSON text envelope
    ///
    /// # Errors
    ///
    /// - `UnsupportedOperation` on an ed25519 service
    /// - `InvalidKey` if the recipient key is not a valid point
    pub fn encrypt_with_public_key(
        &self,
        data: &[u8],
        recipient_public_key: &[u8],
    ) -> Result<String> {
        Ok(self.seal_for(data, recipient_public_key)?.to_text())
    }

    /// Decrypt a JSON text envelope
    ///
    /// Malformed JSON, a wrong key and a tampered tag all produce the same
    /// `DecryptionFailed`.
    pub fn decrypt_with_private_key(
        &self,
        envelope: &str,
        private_key: &[u8],
    ) -> Result<Vec<u8>> {
        const OP: &str = "decrypt_with_private_key";
        self.key_agreement(OP)?;

        let envelope =
            AsymmetricEnvelope::from_text(envelope).map_err(|_| CryptoError::decryption(OP))?;
        self.open_with(&envelope, private_key)
    }

    /// [`Self::decrypt_with_private_key`] for UTF-8 payloads
    pub fn decrypt_text(&self, envelope: &str, private_key: &[u8]) -> Result<String> {
        let plaintext = self.decrypt_with_private_key(envelope, private_key)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::decryption("decrypt_text"))
    }

    /// Encrypt a large payload under a random session key, wrapping the
    /// session key for `recipient_public_key`
    pub fn encrypt_large_data(
        &self,
        data: &[u8],
        recipient_public_key: &[u8],
    ) -> Result<HybridPayload> {
        self.key_agreement("encrypt_large_data")?;

        let session_key = random_bytes::<KEY_SIZE>();
        let encrypted_symmetric_key =
            self.encrypt_with_public_key(&session_key, recipient_public_key)?;
        let data_envelope = aead::seal(&session_key, data)?;

        debug!("Encrypted {} bytes with hybrid session key", data.len());

        Ok(HybridPayload {
            encrypted_data: data_envelope.to_text(TagField::AuthTag),
            encrypted_symmetric_key,
        })
    }

    /// Unwrap the session key, then decrypt the data envelope
    pub fn decrypt_large_data(
        &self,
        payload: &HybridPayload,
        private_key: &[u8],
    ) -> Result<Vec<u8>> {
        const OP: &str = "decrypt_large_data";
        self.key_agreement(OP)?;

        let session_key = self
            .decrypt_with_private_key(&payload.encrypted_symmetric_key, private_key)
            .map_err(|_| CryptoError::decryption(OP))?;
        let data_envelope = AeadEnvelope::from_text(&payload.encrypted_data, TagField::AuthTag)
            .map_err(|_| CryptoError::decryption(OP))?;

        aead::open(&session_key, &data_envelope).map_err(|_| CryptoError::decryption(OP))
    }

    /// Encrypt raw bytes (e.g. file contents) with discrete output fields
    pub fn encrypt_binary_data(
        &self,
        data: &[u8],
        recipient_public_key: &[u8],
    ) -> Result<BinaryHybridPayload> {
        self.key_agreement("encrypt_binary_data")?;

        let session_key = random_bytes::<KEY_SIZE>();
        let encrypted_symmetric_key =
            self.encrypt_with_public_key(&session_key, recipient_public_key)?;
        let envelope = aead::seal(&session_key, data)?;

        debug!("Encrypted {} binary bytes with hybrid session key", data.len());

        Ok(BinaryHybridPayload {
            encrypted_data: envelope.ciphertext,
            encrypted_symmetric_key,
            iv: envelope.iv,
            auth_tag: envelope.tag,
        })
    }

    pub fn decrypt_binary_data(
        &self,
        payload: &BinaryHybridPayload,
        private_key: &[u8],
    ) -> Result<Vec<u8>> {
        const OP: &str = "decrypt_binary_data";
        self.key_agreement(OP)?;

        let session_key = self
            .decrypt_with_private_key(&payload.encrypted_symmetric_key, private_key)
            .map_err(|_| CryptoError::decryption(OP))?;
        let envelope = AeadEnvelope {
            iv: payload.iv,
            tag: payload.auth_tag,
            ciphertext: payload.encrypted_data.clone(),
        };

        aead::open(&session_key, &envelope).map_err(|_| CryptoError::decryption(OP))
    }
}
