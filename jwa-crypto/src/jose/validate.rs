//! JWK checks shared by the algorithm handlers on import.

use jwa_error::JwaError;

use crate::jose::{EllipticCurve, JWK, JWKType, JWKUse, KeyOperation, KeyUsages};

/// The usages declared by the `key_ops` member, if any.
///
/// Duplicate entries make the key invalid.
pub(super) fn declared_usages(jwk: &JWK) -> Result<Option<KeyUsages>, JwaError> {
    let Some(key_ops) = jwk.key_ops.as_ref() else {
        return Ok(None);
    };

    let mut usages = KeyUsages::new();
    for op in key_ops {
        if !usages.insert(*op) {
            return Err(JwaError::validation(format!(
                "Invalid key operations key parameter: duplicate '{op}'"
            )));
        }
    }
    Ok(Some(usages))
}

pub(super) fn expect_key_type(jwk: &JWK, kty: JWKType) -> Result<(), JwaError> {
    if jwk.kty == kty {
        Ok(())
    } else {
        Err(JwaError::validation(format!(
            "Invalid key type: expected '{kty}', got '{}'",
            jwk.kty
        )))
    }
}

pub(super) fn expect_curve(jwk: &JWK, curve: EllipticCurve) -> Result<(), JwaError> {
    match jwk.crv {
        Some(crv) if crv == curve => Ok(()),
        Some(crv) => Err(JwaError::validation(format!(
            "Invalid crv key parameter: expected {curve:?}, got {crv:?}"
        ))),
        None => Err(JwaError::validation("Missing crv key parameter")),
    }
}

/// Usages of an asymmetric signature key.
///
/// Starts from `key_ops`, a `sig` use implies `verify`, a private
/// component implies `sign` and its absence `verify`. An `enc` use
/// cannot be combined with a signature algorithm.
pub(super) fn infer_signature_usages(jwk: &JWK) -> Result<KeyUsages, JwaError> {
    let mut usages = declared_usages(jwk)?.unwrap_or_default();

    match jwk.r#use {
        Some(JWKUse::Signature) => {
            usages.insert(KeyOperation::Verify);
        }
        Some(JWKUse::Encryption) => {
            return Err(JwaError::validation(
                "Invalid use key parameter: signature keys cannot be used for encryption",
            ));
        }
        None => (),
    }

    if jwk.is_private() {
        usages.insert(KeyOperation::Sign);
    } else {
        usages.insert(KeyOperation::Verify);
    }

    Ok(usages)
}
