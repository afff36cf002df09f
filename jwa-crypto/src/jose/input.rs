use std::{borrow::Cow, fmt};

use base64::{Engine as _, prelude::BASE64_URL_SAFE_NO_PAD};
use jwa_error::{ErrorContext as _, JwaError, JwaErrorKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Input accepted by the [`JWAFacade`] operations.
///
/// This is the single place where text, raw bytes and base64url text are
/// turned into the byte buffers the handlers and provider work with.
///
/// `&str` and `String` convert into [`Input::Text`], byte slices and vectors
/// into [`Input::Bytes`]. Use [`Input::base64url`] for encoded values such as
/// an iv or tag received from a peer.
///
/// [`JWAFacade`]: crate::jose::JWAFacade
pub enum Input<'a> {
    /// UTF-8 text, used as its bytes
    Text(Cow<'a, str>),
    /// Raw bytes, used as-is
    Bytes(Cow<'a, [u8]>),
    /// base64url text (padding optional), decoded before use
    Base64Url(Cow<'a, str>),
}

impl<'a> Input<'a> {
    /// Create an [`Input::Text`].
    pub fn text(value: impl Into<Cow<'a, str>>) -> Self {
        Self::Text(value.into())
    }

    /// Create an [`Input::Bytes`].
    pub fn bytes(value: impl Into<Cow<'a, [u8]>>) -> Self {
        Self::Bytes(value.into())
    }

    /// Create an [`Input::Base64Url`].
    pub fn base64url(value: impl Into<Cow<'a, str>>) -> Self {
        Self::Base64Url(value.into())
    }

    /// Normalize this input into its canonical bytes.
    ///
    /// Only fails for [`Input::Base64Url`] input that is not valid base64url.
    pub fn to_bytes(&self) -> Result<Cow<'_, [u8]>, JwaError> {
        match self {
            Self::Text(text) => Ok(Cow::Borrowed(text.as_bytes())),
            Self::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_ref())),
            Self::Base64Url(encoded) => decode(encoded).map(Cow::Owned),
        }
    }

    /// Reinterpret [`Input::Text`] as [`Input::Base64Url`],
    /// used for values that are always transported encoded (ciphertext, iv, tag).
    pub(crate) fn text_as_base64url(self) -> Self {
        match self {
            Self::Text(text) => Self::Base64Url(text),
            other => other,
        }
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for Input<'static> {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value))
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Bytes(Cow::Borrowed(value))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Self::Bytes(Cow::Borrowed(value.as_slice()))
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        Self::Bytes(Cow::Borrowed(value.as_slice()))
    }
}

impl From<Vec<u8>> for Input<'static> {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(Cow::Owned(value))
    }
}

impl<'a> From<&'a Signature> for Input<'a> {
    fn from(value: &'a Signature) -> Self {
        Self::Base64Url(Cow::Borrowed(value.as_str()))
    }
}

impl From<Signature> for Input<'static> {
    fn from(value: Signature) -> Self {
        Self::Base64Url(Cow::Owned(value.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// A base64url encoded signature (or MAC), as produced by a sign operation.
///
/// Converts into an [`Input::Base64Url`] so it can be passed back into verify as-is.
pub struct Signature(String);

impl Signature {
    pub(crate) fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self(encode(bytes))
    }

    /// The base64url text of this signature.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the signature into its raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, JwaError> {
        decode(&self.0)
    }

    /// Returns true for the empty signature of the `none` algorithm.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Signature> for String {
    fn from(value: Signature) -> Self {
        value.0
    }
}

/// Encode bytes as unpadded base64url text.
pub(crate) fn encode(bytes: impl AsRef<[u8]>) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url text, with or without padding.
pub(crate) fn decode(encoded: &str) -> Result<Vec<u8>, JwaError> {
    BASE64_URL_SAFE_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .context("decode base64url input")
        .map_err(|err| JwaError::from_opaque(JwaErrorKind::Data, err))
}
