use jwa::crypto::jose::{EncryptionResult, GenerateKeyOptions, Input, KeyOperation};
use jwa::crypto::provider::{AwsLcKey, KeyData, KeyFormat};
use tokio_test::assert_ok;

use super::facade;
use super::vectors;

fn encrypt_and_decrypt() -> GenerateKeyOptions {
    GenerateKeyOptions::for_key_ops([KeyOperation::Encrypt, KeyOperation::Decrypt])
}

async fn aes_key(alg: &str) -> AwsLcKey {
    facade()
        .generate_key(alg, &encrypt_and_decrypt())
        .await
        .unwrap()
        .into_secret()
        .unwrap()
}

/// Flip the first base64url character, changing the first decoded byte.
fn tamper(value: &str) -> String {
    let mut chars: Vec<char> = value.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[tokio::test]
async fn round_trip_for_every_key_size() {
    let jwa = facade();
    for alg in ["A128GCM", "A192GCM", "A256GCM"] {
        let key = aes_key(alg).await;
        let encrypted = assert_ok!(jwa.encrypt(alg, &key, "hello world", None).await);
        assert!(encrypted.aad.is_none());
        assert_eq!(encrypted.tag.len(), 22, "{alg}");
        assert_eq!(encrypted.iv.len(), 16, "{alg}");

        let plaintext = jwa
            .decrypt(
                alg,
                &key,
                encrypted.ciphertext.as_str(),
                encrypted.iv.as_str(),
                encrypted.tag.as_str(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(plaintext, "hello world");
    }
}

#[tokio::test]
async fn aad_is_authenticated() {
    let jwa = facade();
    let key = aes_key("A256GCM").await;
    let encrypted = jwa
        .encrypt("A256GCM", &key, "hello", Some(Input::from("header")))
        .await
        .unwrap();
    assert!(encrypted.aad.is_some());

    let plaintext = jwa
        .decrypt_result("A256GCM", &key, &encrypted, Some(Input::from(b"header")))
        .await
        .unwrap();
    assert_eq!(plaintext, "hello");

    let err = jwa
        .decrypt_result("A256GCM", &key, &encrypted, Some(Input::from("other")))
        .await
        .unwrap_err();
    assert!(err.is_provider());

    let stripped = EncryptionResult {
        aad: None,
        ..encrypted.clone()
    };
    let err = jwa
        .decrypt_result("A256GCM", &key, &stripped, None)
        .await
        .unwrap_err();
    assert!(err.is_provider());
}

#[tokio::test]
async fn decrypt_result_uses_recorded_aad() {
    let jwa = facade();
    let key = aes_key("A128GCM").await;
    let encrypted = jwa
        .encrypt("A128GCM", &key, "hi", Some(Input::from("ctx")))
        .await
        .unwrap();
    assert_eq!(encrypted.aad.as_deref(), Some("Y3R4"));

    let plaintext = assert_ok!(jwa.decrypt_result("A128GCM", &key, &encrypted, None).await);
    assert_eq!(plaintext, "hi");

    // an explicit aad takes precedence over the recorded one
    let err = jwa
        .decrypt_result("A128GCM", &key, &encrypted, Some(Input::from("xtc")))
        .await
        .unwrap_err();
    assert!(err.is_provider());
}

#[tokio::test]
async fn tampering_is_rejected() {
    let jwa = facade();
    let key = aes_key("A128GCM").await;
    let encrypted = jwa.encrypt("A128GCM", &key, "hello", None).await.unwrap();

    for tampered in [
        EncryptionResult {
            tag: tamper(&encrypted.tag),
            ..encrypted.clone()
        },
        EncryptionResult {
            ciphertext: tamper(&encrypted.ciphertext),
            ..encrypted.clone()
        },
        EncryptionResult {
            iv: tamper(&encrypted.iv),
            ..encrypted.clone()
        },
    ] {
        let err = jwa
            .decrypt_result("A128GCM", &key, &tampered, None)
            .await
            .unwrap_err();
        assert!(err.is_provider());
    }
}

#[tokio::test]
async fn every_encryption_uses_a_fresh_iv() {
    let jwa = facade();
    let key = aes_key("A128GCM").await;
    let first = jwa.encrypt("A128GCM", &key, "same", None).await.unwrap();
    let second = jwa.encrypt("A128GCM", &key, "same", None).await.unwrap();
    assert_ne!(first.iv, second.iv);
    assert_ne!(first.ciphertext, second.ciphertext);
}

#[tokio::test]
async fn imported_jwk_defaults_to_encrypt_and_decrypt() {
    let jwa = facade();
    let imported = jwa
        .import_key(vectors::jwk(vectors::aes_json()))
        .await
        .unwrap();
    let encrypted = jwa
        .encrypt("A256GCM", imported.key(), b"\x00binary\xff".as_slice(), None)
        .await
        .unwrap();
    let plaintext = jwa
        .decrypt_result("A256GCM", imported.key(), &encrypted, None)
        .await
        .unwrap();
    // invalid UTF-8 is replaced, not rejected
    assert_eq!(plaintext, "\u{0}binary\u{fffd}");

    let KeyData::Bytes(raw) = jwa
        .export_key(KeyFormat::Raw, imported.key())
        .await
        .unwrap()
    else {
        panic!("expected raw key bytes");
    };
    assert_eq!(raw.len(), 32);
}

#[tokio::test]
async fn sign_only_key_cannot_encrypt() {
    let jwa = facade();
    let hmac = jwa
        .generate_key("HS256", &GenerateKeyOptions::for_key_ops([KeyOperation::Sign]))
        .await
        .unwrap()
        .into_secret()
        .unwrap();
    let err = jwa.encrypt("A256GCM", &hmac, "hello", None).await.unwrap_err();
    assert!(err.is_provider());

    let aes = facade()
        .generate_key("A128GCM", &GenerateKeyOptions::for_key_ops([KeyOperation::Decrypt]))
        .await
        .unwrap()
        .into_secret()
        .unwrap();
    let err = jwa.encrypt("A128GCM", &aes, "hello", None).await.unwrap_err();
    assert!(err.is_provider());
}

#[tokio::test]
async fn non_extractable_keys_refuse_export() {
    let jwa = facade();
    let key = jwa
        .generate_key("A128GCM", &encrypt_and_decrypt().with_extractable(false))
        .await
        .unwrap()
        .into_secret()
        .unwrap();
    assert!(jwa
        .export_key(KeyFormat::Jwk, &key)
        .await
        .unwrap_err()
        .is_provider());
}
