use jwa_error::{JwaError, OpaqueError};
use serde::{Deserialize, Serialize};

use crate::jose::{
    AesGcmParams, AlgorithmDescriptor, Input, JWK, JWKType, KeyOperation, KeyUsages, input,
    validate,
};
use crate::provider::CryptoProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
/// AES in Galois/Counter Mode (`A128GCM`, `A192GCM`, `A256GCM`).
pub struct AesGcm {
    params: AesGcmParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Output of an AES-GCM encryption, every member base64url encoded.
pub struct EncryptionResult {
    pub ciphertext: String,
    pub iv: String,
    pub tag: String,
    /// Only present when additional authenticated data was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad: Option<String>,
}

impl AesGcm {
    /// Length in bytes of the iv generated for every encryption.
    pub const IV_LEN: usize = 12;

    /// AES-GCM with the given key length in bits and a 128 bit tag.
    pub fn new(length: usize) -> Self {
        Self {
            params: AesGcmParams::new(length),
        }
    }

    pub fn from_params(params: AesGcmParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AesGcmParams {
        &self.params
    }

    pub fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor::AesGcm(self.params.clone())
    }

    /// `key_ops` when declared, `encrypt` and `decrypt` otherwise.
    pub(super) fn key_usages(&self, jwk: &JWK) -> Result<KeyUsages, JwaError> {
        validate::expect_key_type(jwk, JWKType::OCT)?;
        Ok(validate::declared_usages(jwk)?
            .unwrap_or_else(|| KeyUsages::from([KeyOperation::Encrypt, KeyOperation::Decrypt])))
    }

    pub(super) async fn encrypt<P: CryptoProvider>(
        &self,
        provider: &P,
        key: &P::Key,
        data: &Input<'_>,
        aad: Option<&Input<'_>>,
    ) -> Result<EncryptionResult, JwaError> {
        let iv = provider
            .random_bytes(Self::IV_LEN)
            .map_err(JwaError::provider)?;
        let aad = aad.map(Input::to_bytes).transpose()?.map(|aad| aad.into_owned());

        let mut params = self.params.clone();
        params.iv = Some(iv.clone());
        params.additional_data = aad.clone();
        let alg = AlgorithmDescriptor::AesGcm(params);

        let data = data.to_bytes()?;
        let mut ciphertext = provider
            .encrypt(&alg, key, &data)
            .await
            .map_err(JwaError::provider)?;

        let split = ciphertext
            .len()
            .checked_sub(self.params.tag_len())
            .ok_or_else(|| {
                JwaError::provider(OpaqueError::from_display(
                    "encryption output is shorter than the authentication tag",
                ))
            })?;
        let tag = ciphertext.split_off(split);

        Ok(EncryptionResult {
            ciphertext: input::encode(&ciphertext),
            iv: input::encode(&iv),
            tag: input::encode(&tag),
            aad: aad.map(input::encode),
        })
    }

    pub(super) async fn decrypt<P: CryptoProvider>(
        &self,
        provider: &P,
        key: &P::Key,
        ciphertext: &Input<'_>,
        iv: &Input<'_>,
        tag: &Input<'_>,
        aad: Option<&Input<'_>>,
    ) -> Result<String, JwaError> {
        let mut params = self.params.clone();
        params.iv = Some(iv.to_bytes()?.into_owned());
        params.additional_data = aad.map(Input::to_bytes).transpose()?.map(|aad| aad.into_owned());
        let alg = AlgorithmDescriptor::AesGcm(params);

        let mut data = ciphertext.to_bytes()?.into_owned();
        data.extend_from_slice(&tag.to_bytes()?);

        let plaintext = provider
            .decrypt(&alg, key, &data)
            .await
            .map_err(JwaError::provider)?;
        Ok(String::from_utf8(plaintext)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned()))
    }
}
