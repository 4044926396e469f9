// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Master-Key Envelope Tests

use record_envelope::crypto::{
    CryptoError, EnvelopeEncryptionService, MasterKey, IV_SIZE, TAG_SIZE,
};

fn service() -> EnvelopeEncryptionService {
    EnvelopeEncryptionService::new(MasterKey::from_bytes([0x5a; 32]))
}

#[test]
fn test_generated_master_key_round_trip() {
    let service = EnvelopeEncryptionService::builder().build();
    let master_key_hex = service.master_key_hex();
    assert_eq!(master_key_hex.len(), 64);
    assert!(master_key_hex.chars().all(|c| c.is_ascii_hexdigit()));

    let key = [0x33u8; 32];
    let envelope = service.encrypt_with_key(b"record", &key).unwrap();
    assert_eq!(service.decrypt_with_key(&envelope, &key).unwrap(), b"record");
}

#[test]
fn test_text_framing_uses_tag_field() {
    let envelope = service().encrypt(b"record").unwrap();
    let value: serde_json::Value = serde_json::from_str(&envelope).unwrap();

    assert_eq!(value["iv"].as_str().unwrap().len(), IV_SIZE * 2);
    assert_eq!(value["tag"].as_str().unwrap().len(), TAG_SIZE * 2);
    assert!(value["encrypted"].is_string());
    assert!(value.get("authTag").is_none());
}

#[test]
fn test_other_master_key_cannot_decrypt() {
    let envelope = service().encrypt(b"record").unwrap();
    let other = EnvelopeEncryptionService::new(MasterKey::from_bytes([0x5b; 32]));

    let result = other.decrypt(&envelope);
    assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
}

#[test]
fn test_asymmetric_framing_rejected() {
    // authTag spelling belongs to the asymmetric service
    let envelope = format!(
        r#"{{"iv":"{}","authTag":"{}","encrypted":""}}"#,
        "00".repeat(16),
        "00".repeat(16)
    );
    assert!(service().decrypt(&envelope).is_err());
}

#[test]
fn test_wrap_unwrap_key() {
    let service = service();
    let data_key = [0xC3u8; 32];

    let wrapped = service.encrypt_key(&data_key).unwrap();
    assert_eq!(service.decrypt_key(&wrapped).unwrap(), data_key.to_vec());
}

#[test]
fn test_deterministic_key_scenario() {
    let service = service();

    let k1 = service.generate_deterministic_key("record-42", "encryption");
    let k2 = service.generate_deterministic_key("record-42", "encryption");
    let k3 = service.generate_deterministic_key("record-42", "signing");
    assert_eq!(k1, k2);
    assert_ne!(k1, k3);

    // Derived keys are usable AES keys
    let key = hex::decode(&k1).unwrap();
    let envelope = service.encrypt_with_key(b"record", &key).unwrap();
    assert_eq!(service.decrypt_with_key(&envelope, &key).unwrap(), b"record");
}

#[test]
fn test_deterministic_key_depends_on_master_key() {
    let other = EnvelopeEncryptionService::new(MasterKey::from_bytes([0x5b; 32]));
    assert_ne!(
        service().generate_deterministic_key("seed", "ctx"),
        other.generate_deterministic_key("seed", "ctx")
    );
}

#[test]
fn test_binary_round_trip() {
    let service = service();
    let key = [0x11u8; 32];

    for data in [vec![], b"scan".to_vec(), vec![0u8; 10_000]] {
        let combined = service.encrypt_binary(&data, &key, None).unwrap();
        assert_eq!(combined.len(), IV_SIZE + TAG_SIZE + data.len());
        assert_eq!(service.decrypt_binary(&combined, &key).unwrap(), data);
    }
}

#[test]
fn test_binary_random_iv_differs() {
    let service = service();
    let key = [0x11u8; 32];

    let first = service.encrypt_binary(b"scan", &key, None).unwrap();
    let second = service.encrypt_binary(b"scan", &key, None).unwrap();
    assert_ne!(first[..IV_SIZE], second[..IV_SIZE]);
}

#[test]
fn test_binary_too_short() {
    let result = service().decrypt_binary(&[0u8; 31], &[0x11u8; 32]);
    assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
}

#[test]
fn test_binary_tampered() {
    let service = service();
    let key = [0x11u8; 32];
    let mut combined = service.encrypt_binary(b"scan", &key, None).unwrap();

    let last = combined.len() - 1;
    combined[last] ^= 0x01;
    assert!(service.decrypt_binary(&combined, &key).is_err());

    combined[last] ^= 0x01;
    combined[IV_SIZE] ^= 0x01;
    assert!(service.decrypt_binary(&combined, &key).is_err());
}

#[test]
fn test_wrong_key_length() {
    let service = service();
    let result = service.encrypt_with_key(b"record", &[0u8; 16]);
    assert!(matches!(result, Err(CryptoError::InvalidKey { .. })));
}
