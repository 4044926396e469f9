// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signature Tests
//!
//! Sign/verify properties on both curves. Verification never errors: a bad
//! signature, key or message is simply `false`.

use k256::ecdsa::Signature;
use record_envelope::crypto::{AsymmetricEncryptionService, CurveKind};

fn services() -> [AsymmetricEncryptionService; 2] {
    [
        AsymmetricEncryptionService::new(CurveKind::Secp256k1),
        AsymmetricEncryptionService::new(CurveKind::Ed25519),
    ]
}

#[test]
fn test_sign_and_verify() {
    for service in services() {
        let pair = service.generate_key_pair().unwrap();
        let signature = service.sign(b"ledger entry", &pair.private_key).unwrap();

        assert!(
            service.verify(b"ledger entry", &signature, &pair.public_key),
            "{} signature should verify",
            service.curve()
        );
    }
}

#[test]
fn test_verify_wrong_message() {
    for service in services() {
        let pair = service.generate_key_pair().unwrap();
        let signature = service.sign(b"ledger entry", &pair.private_key).unwrap();

        assert!(!service.verify(b"ledger entry!", &signature, &pair.public_key));
    }
}

#[test]
fn test_verify_wrong_key() {
    for service in services() {
        let signer = service.generate_key_pair().unwrap();
        let other = service.generate_key_pair().unwrap();
        let signature = service.sign(b"ledger entry", &signer.private_key).unwrap();

        assert!(!service.verify(b"ledger entry", &signature, &other.public_key));
    }
}

#[test]
fn test_verify_garbage_inputs() {
    for service in services() {
        let pair = service.generate_key_pair().unwrap();

        assert!(!service.verify(b"data", "not-hex", &pair.public_key));
        assert!(!service.verify(b"data", "", &pair.public_key));
        assert!(!service.verify(b"data", &"00".repeat(64), &pair.public_key));
        assert!(!service.verify(b"data", &"00".repeat(64), &[1, 2, 3]));
    }
}

#[test]
fn test_ed25519_signatures_are_deterministic() {
    let service = AsymmetricEncryptionService::new(CurveKind::Ed25519);
    let pair = service.generate_key_pair().unwrap();

    let first = service.sign(b"data", &pair.private_key).unwrap();
    let second = service.sign(b"data", &pair.private_key).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 128);
}

#[test]
fn test_derive_public_key_matches_pair() {
    for service in services() {
        let pair = service.generate_key_pair().unwrap();
        assert_eq!(
            service.derive_public_key(&pair.private_key).unwrap(),
            pair.public_key
        );
        assert!(service.is_valid_public_key(&pair.public_key));
    }
}

#[test]
fn test_public_key_sizes() {
    let secp = AsymmetricEncryptionService::new(CurveKind::Secp256k1);
    let pair = secp.generate_key_pair().unwrap();
    assert_eq!(pair.public_key.len(), 65);
    assert_eq!(pair.private_key.len(), 32);

    let ed = AsymmetricEncryptionService::new(CurveKind::Ed25519);
    let pair = ed.generate_key_pair().unwrap();
    assert_eq!(pair.public_key.len(), 32);
    assert_eq!(pair.private_key.len(), 32);
}

#[test]
fn test_is_valid_public_key_never_errors() {
    for service in services() {
        assert!(!service.is_valid_public_key(&[]));
        assert!(!service.is_valid_public_key(&[0u8; 7]));
        assert!(!service.is_valid_public_key(&[0xffu8; 65]));
    }
}

#[test]
fn test_secp256k1_accepts_high_s_signature() {
    let service = AsymmetricEncryptionService::new(CurveKind::Secp256k1);
    let pair = service.generate_key_pair().unwrap();

    let signature_hex = service.sign(b"ledger entry", &pair.private_key).unwrap();
    let signature = Signature::from_der(&hex::decode(&signature_hex).unwrap()).unwrap();

    // (r, n - s) is the other valid signature for the same message
    let (r, s) = signature.split_scalars();
    let high_s = Signature::from_scalars(r.to_bytes(), (-*s).to_bytes()).unwrap();
    let high_s_hex = hex::encode(high_s.to_der().as_bytes());
    assert_ne!(high_s_hex, signature_hex);

    assert!(service.verify(b"ledger entry", &high_s_hex, &pair.public_key));
    assert!(!service.verify(b"tampered entry", &high_s_hex, &pair.public_key));
}
