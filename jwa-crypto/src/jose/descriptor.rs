use serde::{Deserialize, Serialize};

use crate::jose::JWA;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
/// Hash function used by a signature or MAC algorithm.
pub enum HashAlgorithm {
    #[serde(rename = "SHA-256")]
    Sha256,
    #[serde(rename = "SHA-384")]
    Sha384,
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl HashAlgorithm {
    /// Digest output length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Internal block length in bytes, the default HMAC key length.
    pub fn block_len(self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha384 | Self::Sha512 => 128,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
/// Named elliptic curves, serialized as their JWK `crv` value.
pub enum EllipticCurve {
    #[serde(rename = "P-256")]
    P256,
    #[serde(rename = "P-384")]
    P384,
    #[serde(rename = "P-521")]
    P521,
    /// The SECG curve used by `KS256`, see [`rfc8812`].
    ///
    /// [`rfc8812`]: https://datatracker.ietf.org/doc/html/rfc8812
    #[serde(rename = "secp256k1")]
    Secp256k1,
}

impl EllipticCurve {
    /// Length in bytes of a single coordinate (and of the private scalar).
    pub fn coordinate_len(self) -> usize {
        match self {
            Self::P256 | Self::Secp256k1 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmacParams {
    pub hash: HashAlgorithm,
    /// Key length in bits, defaults to the block size of the hash.
    pub length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcdsaParams {
    pub named_curve: EllipticCurve,
    pub hash: HashAlgorithm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaHashedParams {
    pub hash: HashAlgorithm,
    /// Modulus length in bits, only used when generating keys.
    pub modulus_length: usize,
    pub public_exponent: u32,
}

impl RsaHashedParams {
    pub const DEFAULT_MODULUS_LENGTH: usize = 2048;
    pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65537;

    pub fn new(hash: HashAlgorithm) -> Self {
        Self {
            hash,
            modulus_length: Self::DEFAULT_MODULUS_LENGTH,
            public_exponent: Self::DEFAULT_PUBLIC_EXPONENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parameters of AES-GCM.
///
/// The registered descriptor only carries `length` and `tag_length`,
/// `iv` and `additional_data` are filled in on a per-call copy.
pub struct AesGcmParams {
    /// Key length in bits.
    pub length: usize,
    /// Tag length in bits, 128 when not specified.
    pub tag_length: Option<usize>,
    pub iv: Option<Vec<u8>>,
    pub additional_data: Option<Vec<u8>>,
}

impl AesGcmParams {
    pub const DEFAULT_TAG_LENGTH: usize = 128;

    pub fn new(length: usize) -> Self {
        Self {
            length,
            tag_length: Some(Self::DEFAULT_TAG_LENGTH),
            iv: None,
            additional_data: None,
        }
    }

    /// Tag length in bytes.
    pub fn tag_len(&self) -> usize {
        self.tag_length.unwrap_or(Self::DEFAULT_TAG_LENGTH) / 8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Normalized algorithm descriptor handed to the [`CryptoProvider`].
///
/// A descriptor is registered once together with its handler and is never
/// mutated afterwards: per-call overrides are always applied to a clone.
///
/// [`CryptoProvider`]: crate::provider::CryptoProvider
pub enum AlgorithmDescriptor {
    Hmac(HmacParams),
    Ecdsa(EcdsaParams),
    RsassaPkcs1V15(RsaHashedParams),
    AesGcm(AesGcmParams),
}

impl AlgorithmDescriptor {
    /// Algorithm family name, as used by WebCrypto.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hmac(_) => "HMAC",
            Self::Ecdsa(_) => "ECDSA",
            Self::RsassaPkcs1V15(_) => "RSASSA-PKCS1-v1_5",
            Self::AesGcm(_) => "AES-GCM",
        }
    }

    /// Returns true if both descriptors belong to the same algorithm family.
    pub fn same_family(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// The [`JWA`] identifier this descriptor corresponds to, if any.
    pub fn jwa(&self) -> Option<JWA> {
        match self {
            Self::Hmac(params) => Some(match params.hash {
                HashAlgorithm::Sha256 => JWA::HS256,
                HashAlgorithm::Sha384 => JWA::HS384,
                HashAlgorithm::Sha512 => JWA::HS512,
            }),
            Self::RsassaPkcs1V15(params) => Some(match params.hash {
                HashAlgorithm::Sha256 => JWA::RS256,
                HashAlgorithm::Sha384 => JWA::RS384,
                HashAlgorithm::Sha512 => JWA::RS512,
            }),
            Self::Ecdsa(params) => match (params.named_curve, params.hash) {
                (EllipticCurve::P256, HashAlgorithm::Sha256) => Some(JWA::ES256),
                (EllipticCurve::P384, HashAlgorithm::Sha384) => Some(JWA::ES384),
                (EllipticCurve::P521, HashAlgorithm::Sha512) => Some(JWA::ES512),
                (EllipticCurve::Secp256k1, HashAlgorithm::Sha256) => Some(JWA::KS256),
                _ => None,
            },
            Self::AesGcm(params) => match params.length {
                128 => Some(JWA::A128GCM),
                192 => Some(JWA::A192GCM),
                256 => Some(JWA::A256GCM),
                _ => None,
            },
        }
    }
}
