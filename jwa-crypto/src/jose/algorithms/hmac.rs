use jwa_error::JwaError;

use crate::jose::{
    AlgorithmDescriptor, HashAlgorithm, HmacParams, JWK, JWKType, KeyUsages, validate,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// HMAC with SHA-2 (`HS256`, `HS384`, `HS512`).
pub struct Hmac {
    params: HmacParams,
}

impl Hmac {
    pub fn new(hash: HashAlgorithm) -> Self {
        Self {
            params: HmacParams { hash, length: None },
        }
    }

    pub fn from_params(params: HmacParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &HmacParams {
        &self.params
    }

    pub fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::Hmac(self.params.clone())
    }

    /// Usages are taken from `key_ops` as declared, no usage is implied.
    pub(super) fn key_usages(&self, jwk: &JWK) -> Result<KeyUsages, JwaError> {
        validate::expect_key_type(jwk, JWKType::OCT)?;
        Ok(validate::declared_usages(jwk)?.unwrap_or_default())
    }
}
