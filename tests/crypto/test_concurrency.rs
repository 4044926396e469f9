// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Concurrency Tests
//!
//! Services hold no mutable state, so one instance can be shared by many tasks.

use record_envelope::crypto::{
    AsymmetricEncryptionService, CurveKind, EnvelopeEncryptionService,
};
use std::sync::Arc;

#[tokio::test]
async fn test_shared_asymmetric_service() {
    let service = AsymmetricEncryptionService::new(CurveKind::Secp256k1);
    let pair = Arc::new(service.generate_key_pair().unwrap());

    let mut handles = Vec::new();
    for i in 0..16 {
        let pair = pair.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let data = format!("record-{}", i);
            let envelope = service
                .encrypt_with_public_key(data.as_bytes(), &pair.public_key)
                .unwrap();
            let plaintext = service.decrypt_text(&envelope, &pair.private_key).unwrap();
            assert_eq!(plaintext, data);
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_shared_envelope_service() {
    let service = Arc::new(EnvelopeEncryptionService::generate());
    let expected = service.generate_deterministic_key("seed", "ctx");

    let mut handles = Vec::new();
    for i in 0..16u8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let envelope = service.encrypt(&[i; 8]).unwrap();
            assert_eq!(service.decrypt(&envelope).unwrap(), vec![i; 8]);
            service.generate_deterministic_key("seed", "ctx")
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), expected);
    }
}
