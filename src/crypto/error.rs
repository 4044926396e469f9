// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! One error type for every envelope and key operation.
//!
//! ## Error Variants
//!
//! - **KeyGeneration**: curve math failed while producing a key pair
//! - **InvalidKey**: key has the wrong size, is not a valid point, or does not parse
//! - **UnsupportedOperation**: the configured curve has no such capability
//!   (key agreement on ed25519)
//! - **Encryption**: AEAD encryption or signing could not complete
//! - **DecryptionFailed**: any decryption failure; bad framing, wrong key and
//!   tag mismatch all look the same to the caller
//! - **InvalidPayload**: record content cannot be hashed (wrong shape)
//! - **InvalidConfig**: configuration could not be turned into a service
//!
//! ## Decryption failures
//!
//! `DecryptionFailed` only names the public operation that failed. It must
//! never say whether the envelope was malformed, the key was wrong or the
//! ciphertext was altered.

use crate::crypto::curve::CurveKind;
use thiserror::Error;

/// Result alias used throughout the crypto module
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Error type for all cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Curve math failed while generating a key pair
    #[error("Key generation failed for {curve}: {reason}")]
    KeyGeneration {
        /// Curve the key pair was requested for
        curve: CurveKind,
        /// Specific failure reason
        reason: String,
    },

    /// Invalid cryptographic key
    ///
    /// This error occurs when:
    /// - Key has wrong length
    /// - Key represents invalid curve point
    /// - Key format is unrecognized
    #[error("Invalid key ({key_type}): {reason}")]
    InvalidKey {
        /// Type of key that failed (e.g., "recipient_public_key", "master_key")
        key_type: String,
        /// Specific failure reason
        reason: String,
    },

    /// The operation is not defined for the configured curve
    #[error("Operation '{operation}' is not supported for curve {curve}")]
    UnsupportedOperation {
        /// Which operation was requested
        operation: String,
        /// Curve the service is configured with
        curve: CurveKind,
    },

    /// Encryption or signing could not complete
    #[error("Encryption failed during {operation}: {reason}")]
    Encryption {
        /// Which operation was being performed
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    /// Decryption failed
    #[error("Decryption failed during {operation}")]
    DecryptionFailed {
        /// Which public operation was being performed
        operation: String,
    },

    /// Record content has a shape that cannot be processed
    #[error("Invalid payload field '{field}': {reason}")]
    InvalidPayload {
        /// Which field failed validation
        field: String,
        /// Specific failure reason
        reason: String,
    },

    /// Configuration value could not be used
    #[error("Invalid configuration '{field}': {reason}")]
    InvalidConfig {
        /// Configuration field at fault
        field: String,
        /// Specific failure reason
        reason: String,
    },
}

impl CryptoError {
    pub(crate) fn invalid_key(key_type: &str, reason: impl Into<String>) -> Self {
        CryptoError::InvalidKey {
            key_type: key_type.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn encryption(operation: &str, reason: impl Into<String>) -> Self {
        CryptoError::Encryption {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decryption(operation: &str) -> Self {
        CryptoError::DecryptionFailed {
            operation: operation.to_string(),
        }
    }

    pub(crate) fn unsupported(operation: &str, curve: CurveKind) -> Self {
        CryptoError::UnsupportedOperation {
            operation: operation.to_string(),
            curve,
        }
    }
}
