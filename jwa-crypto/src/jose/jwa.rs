use std::{fmt, str::FromStr};

use jwa_error::JwaError;
use serde::{Deserialize, Serialize};

use crate::jose::{EllipticCurve, Operation};

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
/// [`JWA`] or JSON Web Algorithms as defined in [`rfc7518`]
///
/// Only a subset of these identifiers has a handler registered in the
/// standard [`AlgorithmRegistry`]. The others (RSASSA-PSS and the key
/// management algorithms) are recognized but resolve to a not supported error.
///
/// [`rfc7518`]: https://datatracker.ietf.org/doc/html/rfc7518
/// [`AlgorithmRegistry`]: crate::jose::AlgorithmRegistry
pub enum JWA {
    /// HMAC using SHA-256 (Required)
    HS256,
    /// HMAC using SHA-384 (Optional)
    HS384,
    /// HMAC using SHA-512 (Optional)
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256 (Recommended)
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384 (Optional)
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512 (Optional)
    RS512,
    /// ECDSA using P-256 and SHA-256 (Recommended+)
    ES256,
    /// ECDSA using P-384 and SHA-384 (Optional)
    ES384,
    /// ECDSA using P-521 and SHA-512 (Optional)
    ES512,
    /// ECDSA using secp256k1 and SHA-256
    KS256,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256 (Optional)
    PS256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384 (Optional)
    PS384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512 (Optional)
    PS512,
    /// AES GCM using 128-bit key (Recommended)
    A128GCM,
    /// AES GCM using 192-bit key (Optional)
    A192GCM,
    /// AES GCM using 256-bit key (Recommended)
    A256GCM,
    /// AES Key Wrap with default initial value using 128-bit key (Recommended)
    A128KW,
    /// AES Key Wrap with default initial value using 192-bit key (Optional)
    A192KW,
    /// AES Key Wrap with default initial value using 256-bit key (Recommended)
    A256KW,
    /// Key wrapping with AES GCM using 128-bit key (Optional)
    A128GCMKW,
    /// Key wrapping with AES GCM using 192-bit key (Optional)
    A192GCMKW,
    /// Key wrapping with AES GCM using 256-bit key (Optional)
    A256GCMKW,
    /// RSAES-PKCS1-v1_5 (Recommended-)
    #[serde(rename = "RSA1_5")]
    RSA15,
    /// RSAES OAEP using default parameters (Recommended+)
    #[serde(rename = "RSA-OAEP")]
    RSAOAEP,
    /// RSAES OAEP using SHA-256 and MGF1 with SHA-256 (Optional)
    #[serde(rename = "RSA-OAEP-256")]
    RSAOAEP256,
    /// Direct use of a shared symmetric key as the CEK (Recommended)
    #[serde(rename = "dir")]
    Dir,
    /// Elliptic Curve Diffie-Hellman Ephemeral Static key agreement using Concat KDF (Recommended+)
    #[serde(rename = "ECDH-ES")]
    ECDHES,
    /// No digital signature or MAC performed (Optional)
    ///
    /// Security sensitive: only ever selected when a caller names it explicitly.
    #[serde(rename = "none")]
    None,
}

impl JWA {
    /// All identifiers known to this crate.
    pub const ALL: [Self; 28] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
        Self::KS256,
        Self::PS256,
        Self::PS384,
        Self::PS512,
        Self::A128GCM,
        Self::A192GCM,
        Self::A256GCM,
        Self::A128KW,
        Self::A192KW,
        Self::A256KW,
        Self::A128GCMKW,
        Self::A192GCMKW,
        Self::A256GCMKW,
        Self::RSA15,
        Self::RSAOAEP,
        Self::RSAOAEP256,
        Self::Dir,
        Self::ECDHES,
        Self::None,
    ];

    /// The identifier as it appears in a JOSE header or JWK `alg` member.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::KS256 => "KS256",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::A128GCM => "A128GCM",
            Self::A192GCM => "A192GCM",
            Self::A256GCM => "A256GCM",
            Self::A128KW => "A128KW",
            Self::A192KW => "A192KW",
            Self::A256KW => "A256KW",
            Self::A128GCMKW => "A128GCMKW",
            Self::A192GCMKW => "A192GCMKW",
            Self::A256GCMKW => "A256GCMKW",
            Self::RSA15 => "RSA1_5",
            Self::RSAOAEP => "RSA-OAEP",
            Self::RSAOAEP256 => "RSA-OAEP-256",
            Self::Dir => "dir",
            Self::ECDHES => "ECDH-ES",
            Self::None => "none",
        }
    }

    /// Parse the identifier for the given operation,
    /// mapping an unknown identifier onto a not supported error.
    pub(crate) fn parse_for(operation: Operation, identifier: &str) -> Result<Self, JwaError> {
        identifier
            .parse()
            .map_err(|_err: UnknownAlgorithm| JwaError::not_supported(operation, identifier))
    }
}

impl fmt::Display for JWA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error returned when parsing an identifier that is not a known [`JWA`].
pub struct UnknownAlgorithm(String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown JWA identifier: {}", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for JWA {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_owned()))
    }
}

impl From<EllipticCurve> for JWA {
    fn from(value: EllipticCurve) -> Self {
        match value {
            EllipticCurve::P256 => Self::ES256,
            EllipticCurve::P384 => Self::ES384,
            EllipticCurve::P521 => Self::ES512,
            EllipticCurve::Secp256k1 => Self::KS256,
        }
    }
}

impl TryFrom<JWA> for EllipticCurve {
    type Error = JwaError;

    fn try_from(value: JWA) -> Result<Self, Self::Error> {
        match value {
            JWA::ES256 => Ok(Self::P256),
            JWA::ES384 => Ok(Self::P384),
            JWA::ES512 => Ok(Self::P521),
            JWA::KS256 => Ok(Self::Secp256k1),
            other => Err(JwaError::validation(format!(
                "{other} cannot be converted to elliptic curve"
            ))),
        }
    }
}
