//! The cryptographic provider contract.
//!
//! The algorithm layer in [`crate::jose`] never computes a primitive itself.
//! It hands a normalized [`AlgorithmDescriptor`] together with opaque key
//! handles to a [`CryptoProvider`], which does the actual work.
//!
//! [`AwsLcProvider`] is the provider shipped with this crate.

use std::{fmt, sync::Arc};

use jwa_error::BoxError;
use serde::{Deserialize, Serialize};

use crate::jose::{AlgorithmDescriptor, JWK, KeyUsages};

mod aws_lc;
pub use aws_lc::{AwsLcKey, AwsLcProvider};

#[cfg(test)]
pub(crate) mod mock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Whether a key handle holds secret, public or private key material.
pub enum KeyKind {
    Secret,
    Public,
    Private,
}

/// Opaque key handle created by a [`CryptoProvider`].
pub trait CryptoKey {
    /// The descriptor the key was generated or imported with.
    fn algorithm(&self) -> &AlgorithmDescriptor;

    /// Operations this key may be used for.
    fn usages(&self) -> &KeyUsages;

    /// Whether the key material can be exported.
    fn extractable(&self) -> bool;

    fn kind(&self) -> KeyKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Format of imported or exported key material.
pub enum KeyFormat {
    Raw,
    Pkcs8,
    Spki,
    Jwk,
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::Pkcs8 => "pkcs8",
            Self::Spki => "spki",
            Self::Jwk => "jwk",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Key material in one of the [`KeyFormat`]s.
pub enum KeyData {
    /// `raw`, `pkcs8` or `spki` encoded material
    Bytes(Vec<u8>),
    Jwk(Box<JWK>),
}

impl KeyData {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Jwk(_) => None,
        }
    }

    pub fn as_jwk(&self) -> Option<&JWK> {
        match self {
            Self::Bytes(_) => None,
            Self::Jwk(jwk) => Some(jwk),
        }
    }
}

impl From<JWK> for KeyData {
    fn from(value: JWK) -> Self {
        Self::Jwk(Box::new(value))
    }
}

impl From<Vec<u8>> for KeyData {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

#[derive(Debug, Clone)]
pub struct KeyPair<K> {
    pub public_key: K,
    pub private_key: K,
}

#[derive(Debug, Clone)]
/// Result of a key generation: a single secret key or an asymmetric key pair.
pub enum GeneratedKey<K> {
    Secret(K),
    Pair(KeyPair<K>),
}

impl<K> GeneratedKey<K> {
    pub fn secret(&self) -> Option<&K> {
        match self {
            Self::Secret(key) => Some(key),
            Self::Pair(_) => None,
        }
    }

    pub fn pair(&self) -> Option<&KeyPair<K>> {
        match self {
            Self::Secret(_) => None,
            Self::Pair(pair) => Some(pair),
        }
    }

    pub fn into_secret(self) -> Option<K> {
        match self {
            Self::Secret(key) => Some(key),
            Self::Pair(_) => None,
        }
    }

    pub fn into_pair(self) -> Option<KeyPair<K>> {
        match self {
            Self::Secret(_) => None,
            Self::Pair(pair) => Some(pair),
        }
    }
}

/// Performs the cryptographic primitives for the algorithm handlers.
///
/// Implementations must be safe to call concurrently with the same key.
/// All errors are passed through to the caller as a provider error.
pub trait CryptoProvider: Send + Sync + 'static {
    type Key: CryptoKey + Clone + Send + Sync + 'static;

    type Error: Into<BoxError> + Send + 'static;

    fn sign(
        &self,
        alg: &AlgorithmDescriptor,
        key: &Self::Key,
        data: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;

    fn verify(
        &self,
        alg: &AlgorithmDescriptor,
        key: &Self::Key,
        signature: &[u8],
        data: &[u8],
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Encrypt `data`, returning the ciphertext with the tag appended.
    fn encrypt(
        &self,
        alg: &AlgorithmDescriptor,
        key: &Self::Key,
        data: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;

    /// Decrypt the ciphertext with the tag appended, failing on tag mismatch.
    fn decrypt(
        &self,
        alg: &AlgorithmDescriptor,
        key: &Self::Key,
        data: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;

    fn generate_key(
        &self,
        alg: &AlgorithmDescriptor,
        extractable: bool,
        usages: &KeyUsages,
    ) -> impl Future<Output = Result<GeneratedKey<Self::Key>, Self::Error>> + Send;

    fn import_key(
        &self,
        format: KeyFormat,
        data: &KeyData,
        alg: &AlgorithmDescriptor,
        extractable: bool,
        usages: &KeyUsages,
    ) -> impl Future<Output = Result<Self::Key, Self::Error>> + Send;

    fn export_key(
        &self,
        format: KeyFormat,
        key: &Self::Key,
    ) -> impl Future<Output = Result<KeyData, Self::Error>> + Send;

    /// Cryptographically secure random bytes.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, Self::Error>;
}

impl<P> CryptoProvider for Arc<P>
where
    P: CryptoProvider,
{
    type Key = P::Key;
    type Error = P::Error;

    #[inline]
    fn sign(
        &self,
        alg: &AlgorithmDescriptor,
        key: &Self::Key,
        data: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send {
        self.as_ref().sign(alg, key, data)
    }

    #[inline]
    fn verify(
        &self,
        alg: &AlgorithmDescriptor,
        key: &Self::Key,
        signature: &[u8],
        data: &[u8],
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        self.as_ref().verify(alg, key, signature, data)
    }

    #[inline]
    fn encrypt(
        &self,
        alg: &AlgorithmDescriptor,
        key: &Self::Key,
        data: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send {
        self.as_ref().encrypt(alg, key, data)
    }

    #[inline]
    fn decrypt(
        &self,
        alg: &AlgorithmDescriptor,
        key: &Self::Key,
        data: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send {
        self.as_ref().decrypt(alg, key, data)
    }

    #[inline]
    fn generate_key(
        &self,
        alg: &AlgorithmDescriptor,
        extractable: bool,
        usages: &KeyUsages,
    ) -> impl Future<Output = Result<GeneratedKey<Self::Key>, Self::Error>> + Send {
        self.as_ref().generate_key(alg, extractable, usages)
    }

    #[inline]
    fn import_key(
        &self,
        format: KeyFormat,
        data: &KeyData,
        alg: &AlgorithmDescriptor,
        extractable: bool,
        usages: &KeyUsages,
    ) -> impl Future<Output = Result<Self::Key, Self::Error>> + Send {
        self.as_ref()
            .import_key(format, data, alg, extractable, usages)
    }

    #[inline]
    fn export_key(
        &self,
        format: KeyFormat,
        key: &Self::Key,
    ) -> impl Future<Output = Result<KeyData, Self::Error>> + Send {
        self.as_ref().export_key(format, key)
    }

    #[inline]
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, Self::Error> {
        self.as_ref().random_bytes(len)
    }
}
