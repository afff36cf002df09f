use jwa_error::JwaError;

use crate::jose::{Input, Signature};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// The unsecured `none` algorithm of [`rfc7518`] section 3.6.
///
/// Signing produces an empty signature and only an empty signature verifies.
/// Token verification code must never accept this algorithm unless a caller
/// deliberately opted into unsecured tokens.
///
/// [`rfc7518`]: https://datatracker.ietf.org/doc/html/rfc7518#section-3.6
pub struct Unsecured;

impl Unsecured {
    pub(super) fn sign() -> Signature {
        Signature::from_bytes(b"")
    }

    pub(super) fn verify(signature: &Input<'_>) -> Result<bool, JwaError> {
        Ok(signature.to_bytes()?.is_empty())
    }
}
