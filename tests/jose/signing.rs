use jwa::crypto::jose::{GenerateKeyOptions, Input, KeyOperation, Signature};
use jwa::crypto::provider::CryptoKey;
use tokio_test::assert_ok;

use super::facade;
use super::vectors::{self, RSA_MESSAGE, RSA_SIGNATURE};

fn sign_and_verify() -> GenerateKeyOptions {
    GenerateKeyOptions::for_key_ops([KeyOperation::Sign, KeyOperation::Verify])
}

/// Decoded signature with one bit of its last byte flipped.
fn flip_last_bit(signature: &Signature) -> Vec<u8> {
    let mut bytes = signature.decode().unwrap();
    if let Some(last) = bytes.last_mut() {
        *last ^= 0x01;
    }
    bytes
}

#[tokio::test]
async fn hmac_round_trip() {
    let jwa = facade();
    for (alg, mac_len) in [("HS256", 32), ("HS384", 48), ("HS512", 64)] {
        let key = jwa
            .generate_key(alg, &sign_and_verify())
            .await
            .unwrap()
            .into_secret()
            .unwrap();

        let signature = assert_ok!(jwa.sign(alg, &key, "payload").await);
        assert_eq!(signature.decode().unwrap().len(), mac_len, "{alg}");
        assert!(jwa.verify(alg, &key, &signature, "payload").await.unwrap());
        assert!(!jwa.verify(alg, &key, &signature, "payloaD").await.unwrap());

        // bytes and text normalize to the same input
        assert!(jwa
            .verify(alg, &key, &signature, b"payload".as_slice())
            .await
            .unwrap());
    }
}

#[tokio::test]
async fn ecdsa_round_trip() {
    let jwa = facade();
    for (alg, signature_len) in [("ES256", 64), ("ES384", 96), ("ES512", 132), ("KS256", 64)] {
        let pair = jwa
            .generate_key(alg, &sign_and_verify())
            .await
            .unwrap()
            .into_pair()
            .unwrap();
        assert!(pair.private_key.usages().contains(KeyOperation::Sign));
        assert!(pair.public_key.usages().contains(KeyOperation::Verify));

        let signature = jwa.sign(alg, &pair.private_key, "payload").await.unwrap();
        assert_eq!(signature.decode().unwrap().len(), signature_len, "{alg}");
        assert!(
            jwa.verify(alg, &pair.public_key, &signature, "payload")
                .await
                .unwrap(),
            "{alg}"
        );
        assert!(
            !jwa.verify(alg, &pair.public_key, &signature, "tampered")
                .await
                .unwrap(),
            "{alg}"
        );
    }
}

#[tokio::test]
async fn ecdsa_key_is_bound_to_its_algorithm() {
    let jwa = facade();
    let pair = jwa
        .generate_key("ES256", &sign_and_verify())
        .await
        .unwrap()
        .into_pair()
        .unwrap();
    let err = jwa
        .sign("ES384", &pair.private_key, "payload")
        .await
        .unwrap_err();
    assert!(err.is_provider());
}

#[tokio::test]
async fn rsa_matches_webcrypto_signature() {
    let jwa = facade();
    let private = vectors::jwk(vectors::rsa_private_json());
    let public = private.to_public();

    let private = jwa.import_key(private).await.unwrap();
    let public = jwa.import_key(public).await.unwrap();
    assert_eq!(private.key().usages().as_slice(), &[KeyOperation::Sign]);
    assert_eq!(public.key().usages().as_slice(), &[KeyOperation::Verify]);

    // RSASSA-PKCS1-v1_5 is deterministic
    let signature = jwa.sign("RS256", private.key(), RSA_MESSAGE).await.unwrap();
    assert_eq!(signature.as_str(), RSA_SIGNATURE);

    assert!(jwa
        .verify("RS256", public.key(), RSA_SIGNATURE, RSA_MESSAGE)
        .await
        .unwrap());
    assert!(!jwa
        .verify("RS256", public.key(), RSA_SIGNATURE, "signed with something else")
        .await
        .unwrap());
}

#[tokio::test]
async fn rsa_generate_with_modulus_length() {
    let jwa = facade();
    let pair = jwa
        .generate_key("RS384", &sign_and_verify().with_modulus_length(3072))
        .await
        .unwrap()
        .into_pair()
        .unwrap();
    let signature = jwa.sign("RS384", &pair.private_key, "payload").await.unwrap();
    assert_eq!(signature.decode().unwrap().len(), 3072 / 8);
    assert!(jwa
        .verify("RS384", &pair.public_key, &signature, "payload")
        .await
        .unwrap());

    let err = jwa
        .generate_key("RS256", &sign_and_verify().with_modulus_length(1024))
        .await
        .unwrap_err();
    assert!(err.is_provider());
}

#[tokio::test]
async fn unsecured_none() {
    let jwa = facade();
    let key = jwa
        .generate_key("HS256", &sign_and_verify())
        .await
        .unwrap()
        .into_secret()
        .unwrap();
    let signature = jwa.sign("none", &key, "payload").await.unwrap();
    assert!(signature.is_empty());
    assert!(jwa.verify("none", &key, "", "payload").await.unwrap());

    let jwa = jwa.with_unsecured_none(false);
    assert!(jwa.sign("none", &key, "payload").await.unwrap_err().is_not_supported());
}

#[tokio::test]
async fn unregistered_pairs_are_not_supported() {
    let jwa = facade();
    let key = jwa
        .generate_key("HS256", &sign_and_verify())
        .await
        .unwrap()
        .into_secret()
        .unwrap();

    for alg in ["PS256", "A128GCM", "RSA-OAEP", "hs256", "ES999"] {
        let err = jwa.sign(alg, &key, "payload").await.unwrap_err();
        assert!(err.is_not_supported(), "{alg}");
    }
    assert!(jwa
        .generate_key("none", &sign_and_verify())
        .await
        .unwrap_err()
        .is_not_supported());
    assert!(jwa
        .encrypt_key("A128KW", &key, &key)
        .await
        .unwrap_err()
        .is_not_supported());
    assert!(jwa
        .agree_key("ECDH-ES", &key, &key)
        .await
        .unwrap_err()
        .is_not_supported());
}

#[tokio::test]
async fn generate_requires_key_ops() {
    let jwa = facade();
    for options in [
        GenerateKeyOptions::new(),
        GenerateKeyOptions::for_key_ops(Vec::new()),
    ] {
        let err = jwa.generate_key("ES256", &options).await.unwrap_err();
        assert!(err.is_data());
    }
}

#[tokio::test]
async fn tampered_signatures_do_not_verify() {
    let jwa = facade();

    for alg in ["HS256", "HS384", "HS512"] {
        let key = jwa
            .generate_key(alg, &sign_and_verify())
            .await
            .unwrap()
            .into_secret()
            .unwrap();
        let signature = jwa.sign(alg, &key, "payload").await.unwrap();
        assert!(
            !jwa.verify(alg, &key, flip_last_bit(&signature), "payload")
                .await
                .unwrap(),
            "{alg}"
        );
    }

    for alg in ["ES256", "ES384", "ES512", "KS256"] {
        let pair = jwa
            .generate_key(alg, &sign_and_verify())
            .await
            .unwrap()
            .into_pair()
            .unwrap();
        let signature = jwa.sign(alg, &pair.private_key, "payload").await.unwrap();
        assert!(
            !jwa.verify(alg, &pair.public_key, flip_last_bit(&signature), "payload")
                .await
                .unwrap(),
            "{alg}"
        );
    }

    let private = vectors::jwk(vectors::rsa_private_json());
    let public = jwa.import_key(private.to_public()).await.unwrap();
    let private = jwa.import_key(private).await.unwrap();
    let signature = jwa.sign("RS256", private.key(), RSA_MESSAGE).await.unwrap();
    assert!(!jwa
        .verify("RS256", public.key(), flip_last_bit(&signature), RSA_MESSAGE)
        .await
        .unwrap());
}

#[tokio::test]
async fn undecodable_signature_does_not_verify() {
    let jwa = facade();
    let key = jwa
        .generate_key("HS256", &sign_and_verify())
        .await
        .unwrap()
        .into_secret()
        .unwrap();

    assert!(!jwa.verify("HS256", &key, "not*base64!", "data").await.unwrap());

    // the algorithm is still resolved first
    let err = jwa.verify("HS999", &key, "not*base64!", "data").await.unwrap_err();
    assert!(err.is_not_supported());

    // malformed data stays an error
    let signature = jwa.sign("HS256", &key, "data").await.unwrap();
    let err = jwa
        .verify("HS256", &key, &signature, Input::base64url("not*base64!"))
        .await
        .unwrap_err();
    assert!(err.is_data());
}
