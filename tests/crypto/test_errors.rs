// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Tests
//!
//! Error messages must be descriptive without leaking why a decryption failed.

use record_envelope::crypto::{
    AsymmetricEncryptionService, CryptoError, CurveKind, EnvelopeEncryptionService,
};

#[test]
fn test_decryption_failures_are_indistinguishable() {
    let service = AsymmetricEncryptionService::new(CurveKind::Secp256k1);
    let pair = service.generate_key_pair().unwrap();
    let other = service.generate_key_pair().unwrap();

    let envelope = service
        .encrypt_with_public_key(b"record", &pair.public_key)
        .unwrap();

    let malformed = service
        .decrypt_with_private_key("{}", &pair.private_key)
        .unwrap_err();
    let wrong_key = service
        .decrypt_with_private_key(&envelope, &other.private_key)
        .unwrap_err();

    assert_eq!(malformed, wrong_key);
    assert_eq!(
        malformed.to_string(),
        "Decryption failed during decrypt_with_private_key"
    );
}

#[test]
fn test_unsupported_operation_message() {
    let service = AsymmetricEncryptionService::new(CurveKind::Ed25519);
    let err = service.encrypt_with_public_key(b"x", &[0u8; 32]).unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("ed25519"));
    assert!(msg.contains("encrypt_with_public_key"));
}

#[test]
fn test_invalid_key_message_names_key() {
    let service = AsymmetricEncryptionService::new(CurveKind::Secp256k1);
    let err = service.derive_public_key(&[0u8; 5]).unwrap_err();

    assert!(matches!(err, CryptoError::InvalidKey { .. }));
    assert!(err.to_string().contains("Invalid key"));
}

#[test]
fn test_master_key_errors() {
    let result = EnvelopeEncryptionService::builder().master_key_hex("abcd");
    assert!(matches!(result, Err(CryptoError::InvalidKey { .. })));

    let result = EnvelopeEncryptionService::builder().master_key_hex(&"zz".repeat(32));
    assert!(result.is_err());
}

#[test]
fn test_error_converts_to_anyhow() {
    fn fails() -> anyhow::Result<()> {
        let service = EnvelopeEncryptionService::generate();
        service.decrypt("not json")?;
        Ok(())
    }

    let err = fails().unwrap_err();
    assert!(err.downcast_ref::<CryptoError>().is_some());
}
