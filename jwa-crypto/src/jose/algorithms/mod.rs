//! Algorithm handlers, one per supported algorithm family.
//!
//! [`Algorithm`] is a closed set: every operation is dispatched with an
//! exhaustive match, and an operation a family does not implement
//! reports [`JwaErrorKind::NotSupported`].
//!
//! [`JwaErrorKind::NotSupported`]: jwa_error::JwaErrorKind::NotSupported

use std::fmt;

use jwa_error::JwaError;

use crate::jose::{
    AlgorithmDescriptor, GenerateKeyOptions, ImportedJWK, Input, JWA, JWK, KeyUsages, Operation,
    Signature,
};
use crate::provider::{CryptoProvider, GeneratedKey, KeyData, KeyFormat};

mod hmac;
pub use hmac::Hmac;

mod ecdsa;
pub use ecdsa::Ecdsa;

mod rsa;
pub use rsa::RsassaPkcs1V15;

mod aes_gcm;
pub use aes_gcm::{AesGcm, EncryptionResult};

mod none;
pub use none::Unsecured;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A registered algorithm handler.
pub enum Algorithm {
    Hmac(Hmac),
    Ecdsa(Ecdsa),
    RsassaPkcs1V15(RsassaPkcs1V15),
    AesGcm(AesGcm),
    /// The unsecured `none` algorithm.
    None(Unsecured),
}

impl Algorithm {
    /// The descriptor handed to the provider, `None` for [`Algorithm::None`].
    pub fn descriptor(&self) -> Option<AlgorithmDescriptor> {
        match self {
            Self::Hmac(alg) => Some(alg.descriptor()),
            Self::Ecdsa(alg) => Some(alg.descriptor()),
            Self::RsassaPkcs1V15(alg) => Some(alg.descriptor()),
            Self::AesGcm(alg) => Some(alg.descriptor()),
            Self::None(_) => None,
        }
    }

    /// The identifier this handler implements, if it maps onto one.
    pub fn jwa(&self) -> Option<JWA> {
        match self {
            Self::None(_) => Some(JWA::None),
            _ => self.descriptor().and_then(|alg| alg.jwa()),
        }
    }

    pub fn is_unsecured(&self) -> bool {
        matches!(self, Self::None(_))
    }

    fn unsupported(&self, operation: Operation) -> JwaError {
        JwaError::not_supported(operation, self)
    }

    pub(crate) async fn sign<P: CryptoProvider>(
        &self,
        provider: &P,
        key: &P::Key,
        data: &Input<'_>,
    ) -> Result<Signature, JwaError> {
        match self {
            Self::Hmac(alg) => sign_with(provider, &alg.descriptor(), key, data).await,
            Self::Ecdsa(alg) => sign_with(provider, &alg.descriptor(), key, data).await,
            Self::RsassaPkcs1V15(alg) => sign_with(provider, &alg.descriptor(), key, data).await,
            Self::None(_) => Ok(Unsecured::sign()),
            Self::AesGcm(_) => Err(self.unsupported(Operation::Sign)),
        }
    }

    pub(crate) async fn verify<P: CryptoProvider>(
        &self,
        provider: &P,
        key: &P::Key,
        signature: &Input<'_>,
        data: &Input<'_>,
    ) -> Result<bool, JwaError> {
        match self {
            Self::Hmac(alg) => verify_with(provider, &alg.descriptor(), key, signature, data).await,
            Self::Ecdsa(alg) => {
                verify_with(provider, &alg.descriptor(), key, signature, data).await
            }
            Self::RsassaPkcs1V15(alg) => {
                verify_with(provider, &alg.descriptor(), key, signature, data).await
            }
            Self::None(_) => Unsecured::verify(signature),
            Self::AesGcm(_) => Err(self.unsupported(Operation::Verify)),
        }
    }

    pub(crate) async fn encrypt<P: CryptoProvider>(
        &self,
        provider: &P,
        key: &P::Key,
        data: &Input<'_>,
        aad: Option<&Input<'_>>,
    ) -> Result<EncryptionResult, JwaError> {
        match self {
            Self::AesGcm(alg) => alg.encrypt(provider, key, data, aad).await,
            Self::Hmac(_) | Self::Ecdsa(_) | Self::RsassaPkcs1V15(_) | Self::None(_) => {
                Err(self.unsupported(Operation::Encrypt))
            }
        }
    }

    pub(crate) async fn decrypt<P: CryptoProvider>(
        &self,
        provider: &P,
        key: &P::Key,
        ciphertext: &Input<'_>,
        iv: &Input<'_>,
        tag: &Input<'_>,
        aad: Option<&Input<'_>>,
    ) -> Result<String, JwaError> {
        match self {
            Self::AesGcm(alg) => alg.decrypt(provider, key, ciphertext, iv, tag, aad).await,
            Self::Hmac(_) | Self::Ecdsa(_) | Self::RsassaPkcs1V15(_) | Self::None(_) => {
                Err(self.unsupported(Operation::Decrypt))
            }
        }
    }

    /// Key wrapping is not implemented by any family.
    pub(crate) async fn encrypt_key<P: CryptoProvider>(
        &self,
        _provider: &P,
        _key: &P::Key,
        _wrapping_key: &P::Key,
    ) -> Result<Vec<u8>, JwaError> {
        Err(self.unsupported(Operation::EncryptKey))
    }

    /// Key unwrapping is not implemented by any family.
    pub(crate) async fn decrypt_key<P: CryptoProvider>(
        &self,
        _provider: &P,
        _wrapped_key: &Input<'_>,
        _unwrapping_key: &P::Key,
    ) -> Result<P::Key, JwaError> {
        Err(self.unsupported(Operation::DecryptKey))
    }

    /// Key agreement is not implemented by any family.
    pub(crate) async fn agree_key<P: CryptoProvider>(
        &self,
        _provider: &P,
        _private_key: &P::Key,
        _public_key: &P::Key,
    ) -> Result<Vec<u8>, JwaError> {
        Err(self.unsupported(Operation::AgreeKey))
    }

    pub(crate) async fn generate_key<P: CryptoProvider>(
        &self,
        provider: &P,
        usages: &KeyUsages,
        options: &GenerateKeyOptions,
    ) -> Result<GeneratedKey<P::Key>, JwaError> {
        let extractable = options.extractable();
        match self {
            Self::Hmac(alg) => generate_with(provider, &alg.descriptor(), extractable, usages).await,
            Self::Ecdsa(alg) => {
                generate_with(provider, &alg.descriptor(), extractable, usages).await
            }
            Self::RsassaPkcs1V15(alg) => {
                let descriptor = alg.descriptor_for(options.modulus_length());
                generate_with(provider, &descriptor, extractable, usages).await
            }
            Self::AesGcm(alg) => {
                generate_with(provider, &alg.descriptor(), extractable, usages).await
            }
            Self::None(_) => Err(self.unsupported(Operation::GenerateKey)),
        }
    }

    pub(crate) async fn import_key<P: CryptoProvider>(
        &self,
        provider: &P,
        jwk: JWK,
    ) -> Result<ImportedJWK<P::Key>, JwaError> {
        let (descriptor, usages) = match self {
            Self::Hmac(alg) => (alg.descriptor(), alg.key_usages(&jwk)?),
            Self::Ecdsa(alg) => (alg.descriptor(), alg.key_usages(&jwk)?),
            Self::RsassaPkcs1V15(alg) => (alg.descriptor(), alg.key_usages(&jwk)?),
            Self::AesGcm(alg) => (alg.descriptor(), alg.key_usages(&jwk)?),
            Self::None(_) => return Err(self.unsupported(Operation::ImportKey)),
        };
        import_with(provider, &descriptor, jwk, &usages).await
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.jwa(), self.descriptor()) {
            (Some(jwa), _) => jwa.fmt(f),
            (None, Some(descriptor)) => f.write_str(descriptor.name()),
            (None, None) => f.write_str("unknown"),
        }
    }
}

async fn sign_with<P: CryptoProvider>(
    provider: &P,
    alg: &AlgorithmDescriptor,
    key: &P::Key,
    data: &Input<'_>,
) -> Result<Signature, JwaError> {
    let data = data.to_bytes()?;
    let signature = provider
        .sign(alg, key, &data)
        .await
        .map_err(JwaError::provider)?;
    Ok(Signature::from_bytes(signature))
}

async fn verify_with<P: CryptoProvider>(
    provider: &P,
    alg: &AlgorithmDescriptor,
    key: &P::Key,
    signature: &Input<'_>,
    data: &Input<'_>,
) -> Result<bool, JwaError> {
    let signature = signature.to_bytes()?;
    let data = data.to_bytes()?;
    provider
        .verify(alg, key, &signature, &data)
        .await
        .map_err(JwaError::provider)
}

async fn generate_with<P: CryptoProvider>(
    provider: &P,
    alg: &AlgorithmDescriptor,
    extractable: bool,
    usages: &KeyUsages,
) -> Result<GeneratedKey<P::Key>, JwaError> {
    provider
        .generate_key(alg, extractable, usages)
        .await
        .map_err(JwaError::provider)
}

async fn import_with<P: CryptoProvider>(
    provider: &P,
    alg: &AlgorithmDescriptor,
    jwk: JWK,
    usages: &KeyUsages,
) -> Result<ImportedJWK<P::Key>, JwaError> {
    let extractable = jwk.ext.unwrap_or(true);
    let data = KeyData::from(jwk.clone());
    let key = provider
        .import_key(KeyFormat::Jwk, &data, alg, extractable, usages)
        .await
        .map_err(JwaError::provider)?;
    Ok(ImportedJWK::new(jwk, key))
}
