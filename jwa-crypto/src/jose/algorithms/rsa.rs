use jwa_error::JwaError;

use crate::jose::{
    AlgorithmDescriptor, HashAlgorithm, JWK, JWKType, KeyUsages, RsaHashedParams, validate,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// RSASSA-PKCS1-v1_5 with SHA-2 (`RS256`, `RS384`, `RS512`).
pub struct RsassaPkcs1V15 {
    params: RsaHashedParams,
}

impl RsassaPkcs1V15 {
    pub fn new(hash: HashAlgorithm) -> Self {
        Self {
            params: RsaHashedParams::new(hash),
        }
    }

    pub fn from_params(params: RsaHashedParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RsaHashedParams {
        &self.params
    }

    pub fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::RsassaPkcs1V15(self.params.clone())
    }

    /// Descriptor for key generation, with an optional modulus length override.
    ///
    /// The override only applies to the returned copy.
    pub fn descriptor_for(&self, modulus_length: Option<usize>) -> AlgorithmDescriptor {
        let mut params = self.params.clone();
        if let Some(modulus_length) = modulus_length {
            params.modulus_length = modulus_length;
        }
        AlgorithmDescriptor::RsassaPkcs1V15(params)
    }

    pub(super) fn key_usages(&self, jwk: &JWK) -> Result<KeyUsages, JwaError> {
        validate::expect_key_type(jwk, JWKType::RSA)?;
        validate::infer_signature_usages(jwk)
    }
}
