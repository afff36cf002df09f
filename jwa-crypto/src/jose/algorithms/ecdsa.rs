use jwa_error::JwaError;

use crate::jose::{
    AlgorithmDescriptor, EcdsaParams, EllipticCurve, HashAlgorithm, JWK, JWKType, KeyUsages,
    validate,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// ECDSA over a named curve (`ES256`, `ES384`, `ES512`, `KS256`).
///
/// Signatures use the fixed-length `r || s` encoding of [`rfc7518`] section 3.4.
///
/// [`rfc7518`]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.4
pub struct Ecdsa {
    params: EcdsaParams,
}

impl Ecdsa {
    pub fn new(named_curve: EllipticCurve, hash: HashAlgorithm) -> Self {
        Self {
            params: EcdsaParams { named_curve, hash },
        }
    }

    pub fn params(&self) -> &EcdsaParams {
        &self.params
    }

    pub fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::Ecdsa(self.params.clone())
    }

    pub(super) fn key_usages(&self, jwk: &JWK) -> Result<KeyUsages, JwaError> {
        validate::expect_key_type(jwk, JWKType::EC)?;
        validate::expect_curve(jwk, self.params.named_curve)?;
        validate::infer_signature_usages(jwk)
    }
}
