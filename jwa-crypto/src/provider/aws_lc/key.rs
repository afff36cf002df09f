use std::{fmt, sync::Arc};

use aws_lc_rs::signature::{EcdsaKeyPair, KeyPair as _, RsaKeyPair};
use zeroize::Zeroizing;

use crate::jose::{AlgorithmDescriptor, KeyUsages};
use crate::provider::{CryptoKey, KeyKind};

#[derive(Clone)]
/// Key handle of the [`AwsLcProvider`].
///
/// Cheap to clone, all clones share the same key material.
/// Secret key material is zeroized when the last clone is dropped.
///
/// [`AwsLcProvider`]: super::AwsLcProvider
pub struct AwsLcKey(Arc<KeyInner>);

struct KeyInner {
    algorithm: AlgorithmDescriptor,
    usages: KeyUsages,
    extractable: bool,
    material: KeyMaterial,
}

pub(super) enum KeyMaterial {
    /// HMAC or AES key bytes
    Secret(Zeroizing<Vec<u8>>),
    EcPrivate(EcdsaKeyPair),
    /// Uncompressed point, `0x04 || x || y`
    EcPublic(Vec<u8>),
    RsaPrivate(RsaKeyPair),
    /// DER encoded RSAPublicKey
    RsaPublic(Vec<u8>),
}

impl KeyMaterial {
    pub(super) fn kind(&self) -> KeyKind {
        match self {
            Self::Secret(_) => KeyKind::Secret,
            Self::EcPrivate(_) | Self::RsaPrivate(_) => KeyKind::Private,
            Self::EcPublic(_) | Self::RsaPublic(_) => KeyKind::Public,
        }
    }

    /// The public half of asymmetric key material.
    pub(super) fn public_key(&self) -> Option<&[u8]> {
        match self {
            Self::Secret(_) => None,
            Self::EcPrivate(pair) => Some(pair.public_key().as_ref()),
            Self::RsaPrivate(pair) => Some(pair.public_key().as_ref()),
            Self::EcPublic(point) | Self::RsaPublic(point) => Some(point),
        }
    }
}

impl AwsLcKey {
    pub(super) fn new(
        algorithm: AlgorithmDescriptor,
        usages: KeyUsages,
        extractable: bool,
        material: KeyMaterial,
    ) -> Self {
        Self(Arc::new(KeyInner {
            algorithm,
            usages,
            extractable,
            material,
        }))
    }

    pub(super) fn material(&self) -> &KeyMaterial {
        &self.0.material
    }
}

impl CryptoKey for AwsLcKey {
    fn algorithm(&self) -> &AlgorithmDescriptor {
        &self.0.algorithm
    }

    fn usages(&self) -> &KeyUsages {
        &self.0.usages
    }

    fn extractable(&self) -> bool {
        self.0.extractable
    }

    fn kind(&self) -> KeyKind {
        self.0.material.kind()
    }
}

impl fmt::Debug for AwsLcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsLcKey")
            .field("algorithm", &self.0.algorithm)
            .field("usages", &self.0.usages)
            .field("extractable", &self.0.extractable)
            .field("kind", &self.0.material.kind())
            .finish()
    }
}
