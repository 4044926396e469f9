// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod crypto;

// Re-export main types
pub use config::CryptoConfig;
pub use crypto::{
    AsymmetricEncryptionService, CryptoError, CurveKind, EnvelopeEncryptionService, KeyPair,
    MasterKey,
};
