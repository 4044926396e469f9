// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Asymmetric Hybrid Encryption Tests
//!
//! End-to-end ECDH encryption for text, large and binary payloads, plus the
//! ed25519 key-agreement gate.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use record_envelope::crypto::{
    AsymmetricEncryptionService, AsymmetricEnvelope, BinaryHybridPayload, CryptoError, CurveKind,
    HybridPayload,
};

fn secp() -> AsymmetricEncryptionService {
    AsymmetricEncryptionService::new(CurveKind::Secp256k1)
}

#[test]
fn test_hello_world_round_trip() {
    let service = secp();
    let pair = service.generate_key_pair().unwrap();

    let envelope = service
        .encrypt_with_public_key(b"hello-world", &pair.public_key)
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&envelope).unwrap();
    for field in ["ephemeralPublicKey", "iv", "authTag", "encrypted"] {
        assert!(value[field].is_string(), "missing {}", field);
    }
    assert_eq!(value["iv"].as_str().unwrap().len(), 32);
    assert_eq!(value["authTag"].as_str().unwrap().len(), 32);

    assert_eq!(
        service.decrypt_text(&envelope, &pair.private_key).unwrap(),
        "hello-world"
    );
}

#[test]
fn test_compressed_recipient_key() {
    let service = secp();
    let pair = service.generate_key_pair().unwrap();

    let secret = k256::SecretKey::from_slice(&pair.private_key).unwrap();
    let compressed = secret
        .public_key()
        .to_encoded_point(true)
        .as_bytes()
        .to_vec();
    assert_eq!(compressed.len(), 33);

    let envelope = service
        .encrypt_with_public_key(b"record", &compressed)
        .unwrap();
    assert_eq!(
        service
            .decrypt_with_private_key(&envelope, &pair.private_key)
            .unwrap(),
        b"record"
    );
}

#[test]
fn test_wrong_private_key_fails() {
    let service = secp();
    let recipient = service.generate_key_pair().unwrap();
    let other = service.generate_key_pair().unwrap();

    let envelope = service
        .encrypt_with_public_key(b"record", &recipient.public_key)
        .unwrap();
    let result = service.decrypt_with_private_key(&envelope, &other.private_key);

    assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
}

#[test]
fn test_tampered_envelope_fails() {
    let service = secp();
    let pair = service.generate_key_pair().unwrap();

    let text = service
        .encrypt_with_public_key(b"record", &pair.public_key)
        .unwrap();
    let mut envelope = AsymmetricEnvelope::from_text(&text).unwrap();
    envelope.aead.tag[5] ^= 0x04;

    let result = service.open_with(&envelope, &pair.private_key);
    assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
}

#[test]
fn test_tampered_ciphertext_fails() {
    let service = secp();
    let pair = service.generate_key_pair().unwrap();

    let text = service
        .encrypt_with_public_key(b"record", &pair.public_key)
        .unwrap();
    let mut envelope = AsymmetricEnvelope::from_text(&text).unwrap();
    envelope.aead.ciphertext[0] ^= 0x01;

    let result = service.decrypt_with_private_key(&envelope.to_text(), &pair.private_key);
    assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
}

#[test]
fn test_binary_tampered_ciphertext() {
    let service = secp();
    let pair = service.generate_key_pair().unwrap();

    let mut payload = service
        .encrypt_binary_data(b"scan", &pair.public_key)
        .unwrap();
    payload.encrypted_data[2] ^= 0x10;

    let result = service.decrypt_binary_data(&payload, &pair.private_key);
    assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
}

#[test]
fn test_malformed_envelope_is_decryption_failure() {
    let service = secp();
    let pair = service.generate_key_pair().unwrap();

    for envelope in ["", "{}", "not json", r#"{"iv":"zz","authTag":"","encrypted":""}"#] {
        let result = service.decrypt_with_private_key(envelope, &pair.private_key);
        assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
    }
}

#[test]
fn test_invalid_recipient_key() {
    let service = secp();
    let result = service.encrypt_with_public_key(b"record", &[4u8; 65]);
    assert!(matches!(result, Err(CryptoError::InvalidKey { .. })));
}

#[test]
fn test_large_data_round_trip() {
    let service = secp();
    let pair = service.generate_key_pair().unwrap();
    let data: Vec<u8> = (0..1024 * 1024).map(|i| (i % 251) as u8).collect();

    let payload = service.encrypt_large_data(&data, &pair.public_key).unwrap();
    assert!(payload.encrypted_data.contains("authTag"));

    let decrypted = service
        .decrypt_large_data(&payload, &pair.private_key)
        .unwrap();
    assert_eq!(decrypted, data);
}

#[test]
fn test_large_data_swapped_session_key_fails() {
    let service = secp();
    let pair = service.generate_key_pair().unwrap();

    let mut first = service.encrypt_large_data(b"one", &pair.public_key).unwrap();
    let second = service.encrypt_large_data(b"two", &pair.public_key).unwrap();
    first.encrypted_symmetric_key = second.encrypted_symmetric_key;

    let result = service.decrypt_large_data(&first, &pair.private_key);
    assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
}

#[test]
fn test_binary_round_trip() {
    let service = secp();
    let pair = service.generate_key_pair().unwrap();

    for data in [vec![], vec![0u8, 255, 10, 13], vec![0xAB; 4096]] {
        let payload = service.encrypt_binary_data(&data, &pair.public_key).unwrap();
        assert_eq!(payload.encrypted_data.len(), data.len());

        let decrypted = service
            .decrypt_binary_data(&payload, &pair.private_key)
            .unwrap();
        assert_eq!(decrypted, data);
    }
}

#[test]
fn test_binary_tampered_auth_tag() {
    let service = secp();
    let pair = service.generate_key_pair().unwrap();

    let mut payload = service
        .encrypt_binary_data(b"scan", &pair.public_key)
        .unwrap();
    payload.auth_tag[0] ^= 0xff;

    assert!(service
        .decrypt_binary_data(&payload, &pair.private_key)
        .is_err());
}

#[test]
fn test_ed25519_rejects_key_agreement() {
    let service = AsymmetricEncryptionService::new(CurveKind::Ed25519);
    let pair = service.generate_key_pair().unwrap();

    let unsupported = |result: Result<_, CryptoError>| {
        matches!(result, Err(CryptoError::UnsupportedOperation { .. }))
    };

    assert!(unsupported(
        service
            .encrypt_with_public_key(b"x", &pair.public_key)
            .map(|_| ())
    ));
    assert!(unsupported(
        service
            .decrypt_with_private_key("{}", &pair.private_key)
            .map(|_| ())
    ));
    assert!(unsupported(
        service.encrypt_large_data(b"x", &pair.public_key).map(|_| ())
    ));
    assert!(unsupported(
        service.encrypt_binary_data(b"x", &pair.public_key).map(|_| ())
    ));
    assert!(unsupported(
        service
            .decrypt_large_data(
                &HybridPayload {
                    encrypted_data: "{}".to_string(),
                    encrypted_symmetric_key: "{}".to_string(),
                },
                &pair.private_key,
            )
            .map(|_| ())
    ));
    assert!(unsupported(
        service
            .decrypt_binary_data(
                &BinaryHybridPayload {
                    encrypted_data: vec![1, 2, 3],
                    encrypted_symmetric_key: "{}".to_string(),
                    iv: [0u8; 16],
                    auth_tag: [0u8; 16],
                },
                &pair.private_key,
            )
            .map(|_| ())
    ));
    // Gate applies before the key is even looked at
    assert!(unsupported(
        service.encrypt_with_public_key(b"x", &[]).map(|_| ())
    ));
}
