use std::fmt;

use aws_lc_rs::digest::{SHA256, digest};
use jwa_error::{ErrorContext as _, JwaError, JwaErrorKind};
use serde::{Deserialize, Serialize};

use crate::jose::{EllipticCurve, input};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
/// [`JWK`] or JSON Web Key as defined in [`rfc7517`]
///
/// Members that are not modelled explicitly are kept verbatim in [`JWK::other`],
/// so that a key survives an import and re-serialization unchanged.
///
/// [`rfc7517`]: https://datatracker.ietf.org/doc/html/rfc7517
pub struct JWK {
    pub kty: JWKType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<EllipticCurve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// RSA modulus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA public exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// Private component, ECC private key or RSA private exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
    /// Symmetric key value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#use: Option<JWKUse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_ops: Option<Vec<KeyOperation>>,
    /// Intended algorithm to be used with this key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// The "kty" (key type) parameter identifies the cryptographic algorithm family used with the key, such as "RSA", "EC", or "oct"
pub enum JWKType {
    RSA,
    /// Elliptic curve
    EC,
    /// an octet sequence key, which represents a symmetric key
    #[serde(rename = "oct")]
    OCT,
}

impl fmt::Display for JWKType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RSA => "RSA",
            Self::EC => "EC",
            Self::OCT => "oct",
        })
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// [`JWKUse`] identifies the intended use of the public key
pub enum JWKUse {
    #[serde(rename = "sig")]
    Signature,
    #[serde(rename = "enc")]
    Encryption,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
/// Operation a key is permitted to be used for, as listed in a JWK `key_ops` member.
pub enum KeyOperation {
    Sign,
    Verify,
    Encrypt,
    Decrypt,
    WrapKey,
    UnwrapKey,
    DeriveKey,
    DeriveBits,
}

impl KeyOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sign => "sign",
            Self::Verify => "verify",
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
            Self::WrapKey => "wrapKey",
            Self::UnwrapKey => "unwrapKey",
            Self::DeriveKey => "deriveKey",
            Self::DeriveBits => "deriveBits",
        }
    }
}

impl fmt::Display for KeyOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
/// Set of [`KeyOperation`]s a key may be used for.
///
/// Keeps insertion order, which is also the order in which the usages
/// are reported back to the caller.
pub struct KeyUsages(Vec<KeyOperation>);

impl KeyUsages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation, returns false if it was already present.
    pub fn insert(&mut self, op: KeyOperation) -> bool {
        if self.contains(op) {
            return false;
        }
        self.0.push(op);
        true
    }

    pub fn contains(&self, op: KeyOperation) -> bool {
        self.0.contains(&op)
    }

    pub fn iter(&self) -> impl Iterator<Item = KeyOperation> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[KeyOperation] {
        &self.0
    }

    #[must_use]
    /// Usages present in both sets, in the order of `self`.
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter().filter(|op| other.contains(*op)).collect()
    }
}

impl FromIterator<KeyOperation> for KeyUsages {
    fn from_iter<T: IntoIterator<Item = KeyOperation>>(iter: T) -> Self {
        let mut usages = Self::new();
        for op in iter {
            usages.insert(op);
        }
        usages
    }
}

impl<const N: usize> From<[KeyOperation; N]> for KeyUsages {
    fn from(value: [KeyOperation; N]) -> Self {
        value.into_iter().collect()
    }
}

#[derive(Serialize)]
struct EcThumbprint<'a> {
    crv: EllipticCurve,
    kty: JWKType,
    x: &'a str,
    y: &'a str,
}

#[derive(Serialize)]
struct RsaThumbprint<'a> {
    e: &'a str,
    kty: JWKType,
    n: &'a str,
}

#[derive(Serialize)]
struct OctThumbprint<'a> {
    k: &'a str,
    kty: JWKType,
}

impl JWK {
    /// Create an empty [`JWK`] of the given key type.
    pub fn new(kty: JWKType) -> Self {
        Self {
            kty,
            crv: None,
            x: None,
            y: None,
            n: None,
            e: None,
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
            k: None,
            r#use: None,
            key_ops: None,
            alg: None,
            ext: None,
            kid: None,
            other: serde_json::Map::new(),
        }
    }

    /// Returns true if this key carries a private component (`d`).
    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }

    #[must_use]
    /// Copy of this key with all private members removed.
    pub fn to_public(&self) -> Self {
        Self {
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
            k: None,
            ..self.clone()
        }
    }

    /// JWK Thumbprint as defined in [`rfc7638`], base64url encoded.
    ///
    /// Only the required members of the key type are hashed,
    /// serialized in lexicographic order without whitespace.
    ///
    /// [`rfc7638`]: https://datatracker.ietf.org/doc/html/rfc7638
    pub fn thumbprint_sha256(&self) -> Result<String, JwaError> {
        let canonical = match self.kty {
            JWKType::EC => serde_json::to_vec(&EcThumbprint {
                crv: self.crv.ok_or_else(|| missing_member("crv"))?,
                kty: self.kty,
                x: required(self.x.as_deref(), "x")?,
                y: required(self.y.as_deref(), "y")?,
            }),
            JWKType::RSA => serde_json::to_vec(&RsaThumbprint {
                e: required(self.e.as_deref(), "e")?,
                kty: self.kty,
                n: required(self.n.as_deref(), "n")?,
            }),
            JWKType::OCT => serde_json::to_vec(&OctThumbprint {
                k: required(self.k.as_deref(), "k")?,
                kty: self.kty,
            }),
        }
        .context("serialize jwk thumbprint members")
        .map_err(|err| JwaError::from_opaque(JwaErrorKind::Data, err))?;

        Ok(input::encode(digest(&SHA256, &canonical)))
    }
}

fn required<'a>(member: Option<&'a str>, name: &'static str) -> Result<&'a str, JwaError> {
    member.ok_or_else(|| missing_member(name))
}

fn missing_member(name: &'static str) -> JwaError {
    JwaError::validation(format!("missing required key parameter: {name}"))
}

#[derive(Clone, Debug)]
/// A [`JWK`] together with the provider key handle it was imported into.
///
/// Serializing an [`ImportedJWK`] only ever writes the [`JWK`] view,
/// the key handle is a runtime attachment.
pub struct ImportedJWK<K> {
    jwk: JWK,
    key: K,
}

impl<K> ImportedJWK<K> {
    pub(crate) fn new(jwk: JWK, key: K) -> Self {
        Self { jwk, key }
    }

    /// The key as it was given to the import.
    pub fn jwk(&self) -> &JWK {
        &self.jwk
    }

    /// The provider key handle.
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_parts(self) -> (JWK, K) {
        (self.jwk, self.key)
    }

    pub fn into_key(self) -> K {
        self.key
    }

    /// JSON projection of this key, without the key handle.
    pub fn to_json(&self) -> Result<serde_json::Value, JwaError> {
        serde_json::to_value(&self.jwk)
            .context("serialize imported jwk")
            .map_err(|err| JwaError::from_opaque(JwaErrorKind::Data, err))
    }
}

impl<K> Serialize for ImportedJWK<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.jwk.serialize(serializer)
    }
}
