use jwa::crypto::jose::{GenerateKeyOptions, JWA, JWKUse, KeyOperation};
use jwa::crypto::provider::{CryptoKey, KeyFormat, KeyKind};
use serde_json::json;

use super::facade;
use super::vectors::{self, RSA_MESSAGE, RSA_SIGNATURE};

#[tokio::test]
async fn import_preserves_every_member() {
    let jwa = facade();
    let mut value = vectors::ec_private_json();
    value["kid"] = json!("2026-10-signing");
    value["x5t"] = json!("not interpreted");

    let imported = jwa.import_key(vectors::jwk(value.clone())).await.unwrap();
    assert_eq!(imported.to_json().unwrap(), value);
    assert_eq!(imported.key().kind(), KeyKind::Private);
}

#[tokio::test]
async fn ec_usage_inference() {
    let jwa = facade();

    let imported = jwa
        .import_key(vectors::jwk(vectors::ec_private_json()))
        .await
        .unwrap();
    assert_eq!(imported.key().usages().as_slice(), &[KeyOperation::Sign]);

    let mut with_use = vectors::jwk(vectors::ec_private_json());
    with_use.r#use = Some(JWKUse::Signature);
    let imported = jwa.import_key(with_use).await.unwrap();
    assert!(imported.key().usages().contains(KeyOperation::Sign));
    assert!(imported.key().usages().contains(KeyOperation::Verify));

    let public = vectors::jwk(vectors::ec_private_json()).to_public();
    let imported = jwa.import_key(public).await.unwrap();
    assert_eq!(imported.key().usages().as_slice(), &[KeyOperation::Verify]);
    assert_eq!(imported.key().kind(), KeyKind::Public);
}

#[tokio::test]
async fn invalid_jwks_are_rejected_before_import() {
    let jwa = facade();

    let mut encryption_use = vectors::jwk(vectors::ec_private_json());
    encryption_use.r#use = Some(JWKUse::Encryption);
    assert!(jwa.import_key(encryption_use).await.unwrap_err().is_validation());

    let mut rsa_encryption_use = vectors::jwk(vectors::rsa_private_json());
    rsa_encryption_use.r#use = Some(JWKUse::Encryption);
    assert!(jwa.import_key(rsa_encryption_use).await.unwrap_err().is_validation());

    let mut duplicates = vectors::jwk(vectors::aes_json());
    duplicates.key_ops = Some(vec![KeyOperation::Encrypt, KeyOperation::Encrypt]);
    assert!(jwa.import_key(duplicates).await.unwrap_err().is_validation());

    let mut wrong_curve = vectors::jwk(vectors::ec_private_json());
    wrong_curve.alg = Some("ES384".to_owned());
    assert!(jwa.import_key(wrong_curve).await.unwrap_err().is_validation());

    let mut missing_alg = vectors::jwk(vectors::aes_json());
    missing_alg.alg = None;
    assert!(jwa.import_key(missing_alg).await.unwrap_err().is_not_supported());

    let mut unknown_alg = vectors::jwk(vectors::aes_json());
    unknown_alg.alg = Some("A512GCM".to_owned());
    assert!(jwa.import_key(unknown_alg).await.unwrap_err().is_not_supported());
}

#[tokio::test]
async fn hmac_import_uses_declared_key_ops() {
    let jwa = facade();
    let jwk = vectors::jwk(json!({
        "kty": "oct",
        "k": "Y0zt37HgOx-BY7SQjYVmrqhPkO44Ii2Jcb9yydUDPfE",
        "alg": "HS256",
        "key_ops": ["sign", "verify"],
    }));
    let imported = jwa.import_key(jwk).await.unwrap();
    let signature = jwa.sign("HS256", imported.key(), "payload").await.unwrap();
    assert!(jwa
        .verify("HS256", imported.key(), &signature, "payload")
        .await
        .unwrap());

    // secret keys need at least one usage
    let mut without_key_ops = imported.jwk().clone();
    without_key_ops.key_ops = None;
    assert!(jwa.import_key(without_key_ops).await.unwrap_err().is_provider());
}

#[tokio::test]
async fn exported_public_key_verifies() {
    let jwa = facade();
    let pair = jwa
        .generate_key(
            "ES384",
            &GenerateKeyOptions::for_key_ops([KeyOperation::Sign, KeyOperation::Verify]),
        )
        .await
        .unwrap()
        .into_pair()
        .unwrap();

    let exported = jwa
        .export_key(KeyFormat::Jwk, &pair.public_key)
        .await
        .unwrap();
    let exported = exported.as_jwk().unwrap().clone();
    assert_eq!(exported.alg.as_deref(), Some("ES384"));
    assert!(!exported.is_private());

    let signature = jwa.sign("ES384", &pair.private_key, "payload").await.unwrap();
    let public = jwa.import_key(exported).await.unwrap();
    assert!(jwa
        .verify("ES384", public.key(), &signature, "payload")
        .await
        .unwrap());
}

#[tokio::test]
async fn exported_private_key_round_trips() {
    let jwa = facade();
    let imported = jwa
        .import_key(vectors::jwk(vectors::ec_private_json()))
        .await
        .unwrap();
    let exported = jwa
        .export_key(KeyFormat::Jwk, imported.key())
        .await
        .unwrap();
    let exported = exported.as_jwk().unwrap();
    assert_eq!(exported.d, imported.jwk().d);
    assert_eq!(
        exported.thumbprint_sha256().unwrap(),
        imported.jwk().thumbprint_sha256().unwrap()
    );
}

#[tokio::test]
async fn rsa_public_key_keeps_its_algorithm() {
    let jwa = facade();
    let rs256 = vectors::jwk(vectors::rsa_private_json()).to_public();
    let mut rs384 = rs256.clone();
    rs384.alg = Some("RS384".to_owned());

    let rs256 = jwa.import_key(rs256).await.unwrap();
    let rs384 = jwa.import_key(rs384).await.unwrap();
    assert_eq!(rs256.key().algorithm().jwa(), Some(JWA::RS256));
    assert_eq!(rs384.key().algorithm().jwa(), Some(JWA::RS384));
    assert_eq!(rs256.jwk().alg.as_deref(), Some("RS256"));
    assert_eq!(rs384.jwk().alg.as_deref(), Some("RS384"));

    assert!(jwa
        .verify("RS256", rs256.key(), RSA_SIGNATURE, RSA_MESSAGE)
        .await
        .unwrap());
    assert!(!jwa
        .verify("RS384", rs384.key(), RSA_SIGNATURE, RSA_MESSAGE)
        .await
        .unwrap());
    let err = jwa
        .verify("RS256", rs384.key(), RSA_SIGNATURE, RSA_MESSAGE)
        .await
        .unwrap_err();
    assert!(err.is_provider());
}

#[tokio::test]
async fn secp256k1_jwk_import() {
    let jwa = facade();
    let private = vectors::jwk(vectors::ks256_private_json());
    let public = jwa.import_key(private.to_public()).await.unwrap();
    let private = jwa.import_key(private).await.unwrap();
    assert_eq!(private.key().algorithm().jwa(), Some(JWA::KS256));
    assert_eq!(private.key().kind(), KeyKind::Private);
    assert_eq!(private.key().usages().as_slice(), &[KeyOperation::Sign]);
    assert_eq!(public.key().usages().as_slice(), &[KeyOperation::Verify]);

    let signature = jwa.sign("KS256", private.key(), "payload").await.unwrap();
    assert_eq!(signature.decode().unwrap().len(), 64);
    assert!(jwa
        .verify("KS256", public.key(), &signature, "payload")
        .await
        .unwrap());

    let exported = jwa
        .export_key(KeyFormat::Jwk, private.key())
        .await
        .unwrap();
    let exported = exported.as_jwk().unwrap();
    assert_eq!(exported.d, private.jwk().d);
    assert_eq!(exported.x, private.jwk().x);

    // an ES256 key on the same coordinates is rejected, the curve differs
    let mut wrong_alg = vectors::jwk(vectors::ks256_private_json());
    wrong_alg.alg = Some("ES256".to_owned());
    assert!(jwa.import_key(wrong_alg).await.unwrap_err().is_validation());
}
