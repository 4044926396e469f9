// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Record Envelope Cryptography
//!
//! This module protects record payloads before they go to content-addressed
//! storage or to a party known only by its public key:
//!
//! - **AEAD**: AES-256-GCM with 16-byte IVs and detached 16-byte tags
//! - **Curves**: secp256k1 (ECDSA + ECDH) and ed25519 (EdDSA only)
//! - **Asymmetric**: ephemeral-static ECDH hybrid encryption for text, large
//!   and binary payloads
//! - **Envelope**: master-key envelopes and HMAC-SHA256 per-record keys
//! - **Content Hash**: SHA-256 pointers for storage and ledger entries
//!
//! ## Security Considerations
//!
//! - Keys are owned by the caller and never stored or logged here
//! - IVs, ephemeral keys and session keys come from the OS CSPRNG, one per call
//! - Every decryption failure surfaces as the same `DecryptionFailed`
//! - `verify` and `is_valid_public_key` answer `false` instead of failing
//!
//! ## Protocol Flow
//!
//! 1. Sender generates an ephemeral key pair and performs ECDH with the
//!    recipient's public key
//! 2. The raw shared x-coordinate is the AES-256 key
//! 3. Payload is sealed with AES-256-GCM
//! 4. Envelope carries the ephemeral public key, IV, tag and ciphertext
//! 5. Recipient repeats ECDH with its private key and opens the envelope

pub mod aead;
pub mod asymmetric;
pub mod content_hash;
pub mod curve;
pub mod envelope;
pub mod error;
pub mod master_key;

pub use aead::{AeadEnvelope, TagField, IV_SIZE, KEY_SIZE, TAG_SIZE};
pub use asymmetric::{
    AsymmetricEncryptionService, AsymmetricEnvelope, BinaryHybridPayload, HybridPayload,
};
pub use content_hash::{hash_data, hash_hex, RecordContent};
pub use curve::{CurveBackend, CurveKind, KeyPair};
pub use envelope::{EnvelopeEncryptionService, EnvelopeServiceBuilder};
pub use error::{CryptoError, Result};
pub use master_key::MasterKey;
