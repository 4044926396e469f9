// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-256-GCM Envelopes
//!
//! Every symmetric encryption in the crate goes through this module. One call
//! produces one [`AeadEnvelope`]:
//!
//! ```text
//! iv (16 bytes) | tag (16 bytes) | ciphertext (same length as plaintext)
//! ```
//!
//! - Key: 32 bytes (AES-256)
//! - IV: 16 bytes, drawn from the OS CSPRNG for every call
//! - Tag: 16 bytes, kept detached from the ciphertext
//! - No Additional Authenticated Data (AAD)
//!
//! The same envelope value has two wire forms. The text form is JSON with hex
//! fields and comes in two spellings of the tag field (`tag` for master-key
//! envelopes, `authTag` for envelopes produced by the asymmetric service). The
//! binary form is the fixed-offset concatenation shown above.

use crate::crypto::error::{CryptoError, Result};
use aes_gcm::{
    aead::{consts::U16, generic_array::GenericArray, AeadInPlace, KeyInit},
    aes::Aes256,
    AesGcm,
};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// AES-256 key size in bytes
pub const KEY_SIZE: usize = 32;
/// GCM IV size in bytes
pub const IV_SIZE: usize = 16;
/// GCM authentication tag size in bytes
pub const TAG_SIZE: usize = 16;

/// Offset where the ciphertext starts in the binary framing
const HEADER_SIZE: usize = IV_SIZE + TAG_SIZE;

/// AES-256-GCM with a 128-bit IV
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Output of a single AES-256-GCM encryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AeadEnvelope {
    pub iv: [u8; IV_SIZE],
    pub tag: [u8; TAG_SIZE],
    pub ciphertext: Vec<u8>,
}

/// Spelling of the tag field in the text framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    /// `{iv, tag, encrypted}` - master-key envelopes
    Tag,
    /// `{iv, authTag, encrypted}` - asymmetric service envelopes
    AuthTag,
}

#[derive(Serialize, Deserialize)]
struct TagText {
    iv: String,
    tag: String,
    encrypted: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthTagText {
    iv: String,
    auth_tag: String,
    encrypted: String,
}

/// Fill a fixed-size array from the OS CSPRNG
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

fn cipher_for(key: &[u8]) -> Option<Aes256Gcm16> {
    if key.len() != KEY_SIZE {
        return None;
    }
    Aes256Gcm16::new_from_slice(key).ok()
}

/// Encrypt `plaintext` under `key` with a fresh random IV
///
/// # Errors
///
/// - `InvalidKey` if the key is not 32 bytes
/// - `Encryption` if the cipher refuses the input
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<AeadEnvelope> {
    seal_with_iv(key, random_bytes::<IV_SIZE>(), plaintext)
}

/// Encrypt `plaintext` under `key` with a caller-chosen IV
///
/// The caller is responsible for never reusing an IV with the same key.
pub fn seal_with_iv(key: &[u8], iv: [u8; IV_SIZE], plaintext: &[u8]) -> Result<AeadEnvelope> {
    let cipher = cipher_for(key).ok_or_else(|| {
        CryptoError::invalid_key(
            "aes_key",
            format!("expected {} bytes, got {}", KEY_SIZE, key.len()),
        )
    })?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", &mut buffer)
        .map_err(|e| CryptoError::encryption("aes_gcm_seal", e.to_string()))?;

    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(tag.as_slice());

    debug!("Sealed {} bytes with AES-256-GCM", plaintext.len());

    Ok(AeadEnvelope {
        iv,
        tag: tag_bytes,
        ciphertext: buffer,
    })
}

/// Decrypt an envelope and verify its tag
///
/// A key of the wrong size is reported the same way as a tag mismatch.
pub fn open(key: &[u8], envelope: &AeadEnvelope) -> Result<Vec<u8>> {
    let cipher = cipher_for(key).ok_or_else(|| CryptoError::decryption("aes_gcm_open"))?;

    let mut buffer = envelope.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(&envelope.iv),
            b"",
            &mut buffer,
            GenericArray::from_slice(&envelope.tag),
        )
        .map_err(|_| CryptoError::decryption("aes_gcm_open"))?;

    Ok(buffer)
}

fn decode_fixed<const N: usize>(hex_str: &str) -> Option<[u8; N]> {
    let bytes = hex::decode(hex_str).ok()?;
    bytes.try_into().ok()
}

impl AeadEnvelope {
    /// Render as JSON with hex-encoded fields
    pub fn to_text(&self, field: TagField) -> String {
        let iv = hex::encode(self.iv);
        let tag = hex::encode(self.tag);
        let encrypted = hex::encode(&self.ciphertext);

        // Both shapes only hold strings, serialization cannot fail
        match field {
            TagField::Tag => serde_json::to_string(&TagText { iv, tag, encrypted }),
            TagField::AuthTag => serde_json::to_string(&AuthTagText {
                iv,
                auth_tag: tag,
                encrypted,
            }),
        }
        .unwrap_or_default()
    }

    /// Parse the JSON form produced by [`AeadEnvelope::to_text`]
    pub fn from_text(text: &str, field: TagField) -> Result<Self> {
        let malformed = || CryptoError::decryption("parse_envelope");

        let (iv, tag, encrypted) = match field {
            TagField::Tag => {
                let parsed: TagText = serde_json::from_str(text).map_err(|_| malformed())?;
                (parsed.iv, parsed.tag, parsed.encrypted)
            }
            TagField::AuthTag => {
                let parsed: AuthTagText = serde_json::from_str(text).map_err(|_| malformed())?;
                (parsed.iv, parsed.auth_tag, parsed.encrypted)
            }
        };

        Self::from_hex_fields(&iv, &tag, &encrypted)
    }

    /// Decode the hex fields shared by every text framing
    pub(crate) fn from_hex_fields(iv: &str, tag: &str, encrypted: &str) -> Result<Self> {
        let malformed = || CryptoError::decryption("parse_envelope");

        Ok(AeadEnvelope {
            iv: decode_fixed(iv).ok_or_else(malformed)?,
            tag: decode_fixed(tag).ok_or_else(malformed)?,
            ciphertext: hex::decode(encrypted).map_err(|_| malformed())?,
        })
    }

    /// Concatenate as `iv | tag | ciphertext`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut combined = Vec::with_capacity(HEADER_SIZE + self.ciphertext.len());
        combined.extend_from_slice(&self.iv);
        combined.extend_from_slice(&self.tag);
        combined.extend_from_slice(&self.ciphertext);
        combined
    }

    /// Split a buffer framed as `iv | tag | ciphertext`
    ///
    /// Buffers shorter than 32 bytes are rejected.
    pub fn from_bytes(combined: &[u8]) -> Result<Self> {
        if combined.len() < HEADER_SIZE {
            return Err(CryptoError::decryption("parse_envelope"));
        }

        let mut iv = [0u8; IV_SIZE];
        let mut tag = [0u8; TAG_SIZE];
        iv.copy_from_slice(&combined[..IV_SIZE]);
        tag.copy_from_slice(&combined[IV_SIZE..HEADER_SIZE]);

        Ok(AeadEnvelope {
            iv,
            tag,
            ciphertext: combined[HEADER_SIZE..].to_vec(),
        })
    }
}
