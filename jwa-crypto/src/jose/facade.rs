use std::sync::Arc;

use jwa_error::{ErrorContext as _, JwaError, JwaErrorKind};
use serde::Deserialize;

use crate::jose::{
    Algorithm, AlgorithmRegistry, EncryptionResult, ImportedJWK, Input, JWA, JWK, KeyOperation,
    KeyUsages, Operation, Signature,
};
use crate::provider::{CryptoProvider, GeneratedKey, KeyData, KeyFormat};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
/// Options for [`JWAFacade::generate_key`].
///
/// `key_ops` is required and must not be empty.
pub struct GenerateKeyOptions {
    #[serde(default)]
    key_ops: Option<Vec<KeyOperation>>,
    #[serde(default)]
    extractable: Option<bool>,
    #[serde(default, rename = "modulusLength", alias = "modulus_length")]
    modulus_length: Option<usize>,
}

impl GenerateKeyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with the given key operations and all other options defaulted.
    pub fn for_key_ops(key_ops: impl IntoIterator<Item = KeyOperation>) -> Self {
        Self::new().with_key_ops(key_ops)
    }

    pub fn key_ops(&self) -> Option<&[KeyOperation]> {
        self.key_ops.as_deref()
    }

    #[must_use]
    pub fn with_key_ops(mut self, key_ops: impl IntoIterator<Item = KeyOperation>) -> Self {
        self.key_ops = Some(key_ops.into_iter().collect());
        self
    }

    pub fn set_key_ops(&mut self, key_ops: impl IntoIterator<Item = KeyOperation>) -> &mut Self {
        self.key_ops = Some(key_ops.into_iter().collect());
        self
    }

    /// Whether generated keys can be exported, true unless disabled.
    pub fn extractable(&self) -> bool {
        self.extractable.unwrap_or(true)
    }

    #[must_use]
    pub fn with_extractable(mut self, extractable: bool) -> Self {
        self.extractable = Some(extractable);
        self
    }

    pub fn set_extractable(&mut self, extractable: bool) -> &mut Self {
        self.extractable = Some(extractable);
        self
    }

    /// RSA modulus length in bits, overriding the algorithm default.
    pub fn modulus_length(&self) -> Option<usize> {
        self.modulus_length
    }

    #[must_use]
    pub fn with_modulus_length(mut self, modulus_length: usize) -> Self {
        self.modulus_length = Some(modulus_length);
        self
    }

    pub fn set_modulus_length(&mut self, modulus_length: usize) -> &mut Self {
        self.modulus_length = Some(modulus_length);
        self
    }

    fn key_usages(&self) -> Result<KeyUsages, JwaError> {
        match self.key_ops.as_deref() {
            Some(key_ops) if !key_ops.is_empty() => Ok(key_ops.iter().copied().collect()),
            _ => Err(JwaError::data("Invalid key_ops: expected a non-empty array")),
        }
    }
}

impl TryFrom<serde_json::Value> for GenerateKeyOptions {
    type Error = JwaError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let options: Self = serde_json::from_value(value)
            .context("Invalid key generation options")
            .map_err(|err| JwaError::from_opaque(JwaErrorKind::Data, err))?;
        options.key_usages()?;
        Ok(options)
    }
}

#[derive(Debug, Clone)]
/// Single entry point for all JWA operations.
///
/// Every operation resolves its handler in the [`AlgorithmRegistry`] and
/// reports a not supported error if no handler is registered for the
/// requested operation and algorithm. All errors, including the ones caught
/// before the provider is reached, are returned by the async operation.
///
/// # Example
///
/// ```
/// use jwa_crypto::jose::{GenerateKeyOptions, JWAFacade, KeyOperation};
/// use jwa_crypto::provider::AwsLcProvider;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), jwa_error::JwaError> {
/// let jwa = JWAFacade::new(AwsLcProvider::new());
///
/// let key = jwa
///     .generate_key(
///         "A128GCM",
///         &GenerateKeyOptions::for_key_ops([KeyOperation::Encrypt, KeyOperation::Decrypt]),
///     )
///     .await?;
/// let key = key.secret().expect("AES keys are secret keys");
///
/// let encrypted = jwa.encrypt("A128GCM", key, "hello", None).await?;
/// assert!(encrypted.aad.is_none());
///
/// let plaintext = jwa
///     .decrypt(
///         "A128GCM",
///         key,
///         encrypted.ciphertext.as_str(),
///         encrypted.iv.as_str(),
///         encrypted.tag.as_str(),
///         None,
///     )
///     .await?;
/// assert_eq!(plaintext, "hello");
/// # Ok(())
/// # }
/// ```
pub struct JWAFacade<P> {
    provider: P,
    registry: Arc<AlgorithmRegistry>,
    unsecured_none: bool,
}

impl<P: CryptoProvider> JWAFacade<P> {
    /// Create a facade using the standard [`AlgorithmRegistry`].
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            registry: AlgorithmRegistry::standard(),
            unsecured_none: true,
        }
    }

    #[must_use]
    /// Use a custom [`AlgorithmRegistry`].
    pub fn with_registry(mut self, registry: Arc<AlgorithmRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Use a custom [`AlgorithmRegistry`].
    pub fn set_registry(&mut self, registry: Arc<AlgorithmRegistry>) -> &mut Self {
        self.registry = registry;
        self
    }

    /// Allow or refuse the unsecured `none` algorithm.
    ///
    /// Allowed by default, as it is only ever used when named explicitly.
    /// When refused, `none` is reported as not supported.
    #[must_use]
    pub fn with_unsecured_none(mut self, allow: bool) -> Self {
        self.unsecured_none = allow;
        self
    }

    /// Allow or refuse the unsecured `none` algorithm.
    pub fn set_unsecured_none(&mut self, allow: bool) -> &mut Self {
        self.unsecured_none = allow;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn registry(&self) -> &Arc<AlgorithmRegistry> {
        &self.registry
    }

    fn resolve(&self, operation: Operation, alg: &str) -> Result<Arc<Algorithm>, JwaError> {
        let handler = self.registry.normalize(operation, alg)?;
        if handler.is_unsecured() {
            if !self.unsecured_none {
                tracing::debug!(%operation, "unsecured algorithm refused");
                return Err(JwaError::not_supported(operation, JWA::None));
            }
            tracing::warn!(%operation, "unsecured algorithm 'none' selected");
        }
        Ok(handler)
    }

    /// Sign `data`, returning the base64url encoded signature.
    pub async fn sign<'a>(
        &self,
        alg: &str,
        key: &P::Key,
        data: impl Into<Input<'a>>,
    ) -> Result<Signature, JwaError> {
        let data = data.into();
        let handler = self.resolve(Operation::Sign, alg)?;
        handler.sign(&self.provider, key, &data).await
    }

    /// Verify a signature over `data`.
    ///
    /// A [`Signature`] can be passed as-is. Text signatures are decoded
    /// as base64url, as they appear in a compact JWS. A signature that
    /// does not decode does not verify.
    pub async fn verify<'a>(
        &self,
        alg: &str,
        key: &P::Key,
        signature: impl Into<Input<'a>>,
        data: impl Into<Input<'a>>,
    ) -> Result<bool, JwaError> {
        let data = data.into();
        let handler = self.resolve(Operation::Verify, alg)?;
        let signature = match signature.into().text_as_base64url().to_bytes() {
            Ok(bytes) => Input::bytes(bytes.into_owned()),
            Err(err) => {
                tracing::debug!(%alg, "signature is not valid base64url: {err}");
                return Ok(false);
            }
        };
        handler.verify(&self.provider, key, &signature, &data).await
    }

    /// Encrypt `data` with a fresh random iv.
    pub async fn encrypt<'a>(
        &self,
        alg: &str,
        key: &P::Key,
        data: impl Into<Input<'a>>,
        aad: Option<Input<'a>>,
    ) -> Result<EncryptionResult, JwaError> {
        let data = data.into();
        let handler = self.resolve(Operation::Encrypt, alg)?;
        handler
            .encrypt(&self.provider, key, &data, aad.as_ref())
            .await
    }

    /// Decrypt and authenticate, returning the plaintext as text.
    ///
    /// Text given for `ciphertext`, `iv` and `tag` is decoded as base64url,
    /// `aad` must be given the same way it was given to [`JWAFacade::encrypt`].
    pub async fn decrypt<'a>(
        &self,
        alg: &str,
        key: &P::Key,
        ciphertext: impl Into<Input<'a>>,
        iv: impl Into<Input<'a>>,
        tag: impl Into<Input<'a>>,
        aad: Option<Input<'a>>,
    ) -> Result<String, JwaError> {
        let ciphertext = ciphertext.into().text_as_base64url();
        let iv = iv.into().text_as_base64url();
        let tag = tag.into().text_as_base64url();
        let handler = self.resolve(Operation::Decrypt, alg)?;
        handler
            .decrypt(&self.provider, key, &ciphertext, &iv, &tag, aad.as_ref())
            .await
    }

    /// Decrypt an [`EncryptionResult`] as returned by [`JWAFacade::encrypt`].
    ///
    /// Without an explicit `aad` the one recorded in `encrypted` is used.
    pub async fn decrypt_result<'a>(
        &self,
        alg: &str,
        key: &P::Key,
        encrypted: &'a EncryptionResult,
        aad: Option<Input<'a>>,
    ) -> Result<String, JwaError> {
        let aad = aad.or_else(|| encrypted.aad.as_deref().map(Input::base64url));
        self.decrypt(
            alg,
            key,
            Input::base64url(encrypted.ciphertext.as_str()),
            Input::base64url(encrypted.iv.as_str()),
            Input::base64url(encrypted.tag.as_str()),
            aad,
        )
        .await
    }

    /// Wrap `key` with `wrapping_key`.
    pub async fn encrypt_key(
        &self,
        alg: &str,
        key: &P::Key,
        wrapping_key: &P::Key,
    ) -> Result<Vec<u8>, JwaError> {
        let handler = self.resolve(Operation::EncryptKey, alg)?;
        handler
            .encrypt_key(&self.provider, key, wrapping_key)
            .await
    }

    /// Unwrap `wrapped_key` with `unwrapping_key`.
    pub async fn decrypt_key<'a>(
        &self,
        alg: &str,
        wrapped_key: impl Into<Input<'a>>,
        unwrapping_key: &P::Key,
    ) -> Result<P::Key, JwaError> {
        let wrapped_key = wrapped_key.into().text_as_base64url();
        let handler = self.resolve(Operation::DecryptKey, alg)?;
        handler
            .decrypt_key(&self.provider, &wrapped_key, unwrapping_key)
            .await
    }

    /// Derive a shared secret from a private and a peer public key.
    pub async fn agree_key(
        &self,
        alg: &str,
        private_key: &P::Key,
        public_key: &P::Key,
    ) -> Result<Vec<u8>, JwaError> {
        let handler = self.resolve(Operation::AgreeKey, alg)?;
        handler
            .agree_key(&self.provider, private_key, public_key)
            .await
    }

    /// Generate a key or key pair for `alg`.
    ///
    /// Fails with a data error when `options` carries no `key_ops`.
    pub async fn generate_key(
        &self,
        alg: &str,
        options: &GenerateKeyOptions,
    ) -> Result<GeneratedKey<P::Key>, JwaError> {
        let handler = self.resolve(Operation::GenerateKey, alg)?;
        let usages = options.key_usages()?;
        tracing::debug!(
            alg,
            usages = ?usages.as_slice(),
            extractable = options.extractable(),
            "generate key"
        );
        handler
            .generate_key(&self.provider, &usages, options)
            .await
    }

    /// Import a JWK, using the handler of its `alg` member.
    ///
    /// The returned [`ImportedJWK`] keeps the JWK exactly as given.
    pub async fn import_key(&self, jwk: JWK) -> Result<ImportedJWK<P::Key>, JwaError> {
        let alg = jwk
            .alg
            .clone()
            .ok_or_else(|| JwaError::not_supported(Operation::ImportKey, "<missing alg>"))?;
        let handler = self.resolve(Operation::ImportKey, &alg)?;
        tracing::debug!(alg = %alg, kty = %jwk.kty, kid = jwk.kid.as_deref(), "import jwk");
        handler.import_key(&self.provider, jwk).await
    }

    /// Export key material, this does not depend on the key's algorithm.
    pub async fn export_key(&self, format: KeyFormat, key: &P::Key) -> Result<KeyData, JwaError> {
        self.provider
            .export_key(format, key)
            .await
            .map_err(JwaError::provider)
    }
}
