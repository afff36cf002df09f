//! Minimal DER support for PKCS#1 RSA keys.
//!
//! Only what is needed to move RSA keys between their JWK form and the
//! encoding accepted by `aws-lc-rs`. Not a general ASN.1 implementation.

use jwa_error::OpaqueError;
use zeroize::Zeroizing;

/// Identifier tag for a DER encoded integer.
/// Defined in [ITU X.680](https://www.itu.int/ITU-T/studygroups/com17/languages/X.680-0207.pdf).
const DER_TAG_INTEGER: u8 = 0x02;
/// Identifier tag for a DER encoded sequence.
/// Defined in [ITU X.680](https://www.itu.int/ITU-T/studygroups/com17/languages/X.680-0207.pdf).
const DER_TAG_SEQUENCE: u8 = 0x30;
/// Maximum length of a DER encoded length in short form.
const DER_LENGTH_SHORT_FORM_MAX: usize = 127;
/// Set on the first length octet in long form, and the sign bit of an integer.
const HIGH_BIT: u8 = 0x80;

/// The integers of an RSA private key, big endian without sign.
pub(super) struct RsaPrivateComponents<'a> {
    pub(super) n: &'a [u8],
    pub(super) e: &'a [u8],
    pub(super) d: &'a [u8],
    pub(super) p: &'a [u8],
    pub(super) q: &'a [u8],
    pub(super) dp: &'a [u8],
    pub(super) dq: &'a [u8],
    pub(super) qi: &'a [u8],
}

/// DER encoded RSAPublicKey as defined in section A.1.1 of [RFC 8017](https://datatracker.ietf.org/doc/rfc8017/)
///
///```rust,ignore
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
///```
pub(super) fn rsa_public_key(n: &[u8], e: &[u8]) -> Vec<u8> {
    encode_sequence(&[&encode_integer(n), &encode_integer(e)])
}

/// DER encoded two-prime RSAPrivateKey as defined in section A.1.2 of [RFC 8017](https://datatracker.ietf.org/doc/rfc8017/)
///
///```rust,ignore
/// RSAPrivateKey ::= SEQUENCE {
///     version           Version,  -- 0
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER,  -- e
///     privateExponent   INTEGER,  -- d
///     prime1            INTEGER,  -- p
///     prime2            INTEGER,  -- q
///     exponent1         INTEGER,  -- d mod (p-1)
///     exponent2         INTEGER,  -- d mod (q-1)
///     coefficient       INTEGER   -- (inverse of q) mod p
/// }
///```
pub(super) fn rsa_private_key(key: &RsaPrivateComponents<'_>) -> Zeroizing<Vec<u8>> {
    let integers: Vec<Zeroizing<Vec<u8>>> = [
        &[0u8][..],
        key.n,
        key.e,
        key.d,
        key.p,
        key.q,
        key.dp,
        key.dq,
        key.qi,
    ]
    .into_iter()
    .map(|value| Zeroizing::new(encode_integer(value)))
    .collect();
    let parts: Vec<&[u8]> = integers.iter().map(|value| value.as_slice()).collect();
    Zeroizing::new(encode_sequence(&parts))
}

/// Modulus and public exponent of a DER encoded RSAPublicKey,
/// big endian without leading zeros.
pub(super) fn parse_rsa_public_key(der: &[u8]) -> Result<(Vec<u8>, Vec<u8>), OpaqueError> {
    let mut outer = DerReader::new(der);
    let mut sequence = DerReader::new(outer.read(DER_TAG_SEQUENCE)?);
    let n = strip_leading_zeros(sequence.read(DER_TAG_INTEGER)?);
    let e = strip_leading_zeros(sequence.read(DER_TAG_INTEGER)?);
    if !sequence.is_empty() || !outer.is_empty() {
        return Err(OpaqueError::from_display(
            "trailing data after RSAPublicKey sequence",
        ));
    }
    Ok((n.to_vec(), e.to_vec()))
}

fn encode_sequence(parts: &[&[u8]]) -> Vec<u8> {
    let content_len = parts.iter().map(|part| part.len()).sum();
    let len = encode_der_length(content_len);
    let mut result = Vec::with_capacity(1 + len.len() + content_len);
    result.push(DER_TAG_SEQUENCE);
    result.extend_from_slice(&len);
    for part in parts {
        result.extend_from_slice(part);
    }
    result
}

/// Length encoding as defined in section 8.1.3 of
/// [ITU X.690](https://www.itu.int/ITU-T/studygroups/com17/languages/X.690-0207.pdf).
fn encode_der_length(len: usize) -> Vec<u8> {
    if len <= DER_LENGTH_SHORT_FORM_MAX {
        return vec![len as u8];
    }
    let len_bytes: Vec<u8> = len
        .to_be_bytes()
        .into_iter()
        .skip_while(|b| *b == 0)
        .collect();
    let mut result = Vec::with_capacity(1 + len_bytes.len());
    result.push(HIGH_BIT | len_bytes.len() as u8);
    result.extend(len_bytes);
    result
}

/// Positive integer encoding as defined in section 8.3 of
/// [ITU X.690](https://www.itu.int/ITU-T/studygroups/com17/languages/X.690-0207.pdf).
///
/// Leading zeros of the input are dropped, a single zero is prepended
/// when the sign bit would otherwise be set.
fn encode_integer(value: &[u8]) -> Vec<u8> {
    let value = strip_leading_zeros(value);
    let value: &[u8] = if value.is_empty() { &[0] } else { value };
    let needs_leading_zero = value.first().is_some_and(|b| b & HIGH_BIT != 0);
    let value_len = value.len() + usize::from(needs_leading_zero);
    let len_bytes = encode_der_length(value_len);
    let mut result = Vec::with_capacity(1 + len_bytes.len() + value_len);
    result.push(DER_TAG_INTEGER);
    result.extend_from_slice(&len_bytes);
    if needs_leading_zero {
        result.push(0);
    }
    result.extend_from_slice(value);
    result
}

fn strip_leading_zeros(value: &[u8]) -> &[u8] {
    let start = value.iter().position(|b| *b != 0).unwrap_or(value.len());
    &value[start..]
}

struct DerReader<'a> {
    input: &'a [u8],
}

impl<'a> DerReader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn read(&mut self, tag: u8) -> Result<&'a [u8], OpaqueError> {
        let (&found, rest) = self
            .input
            .split_first()
            .ok_or_else(|| OpaqueError::from_display("unexpected end of DER input"))?;
        if found != tag {
            return Err(OpaqueError::from_display(format!(
                "unexpected DER tag {found:#04x}, expected {tag:#04x}"
            )));
        }
        let (len, rest) = read_length(rest)?;
        if rest.len() < len {
            return Err(OpaqueError::from_display("DER value exceeds input"));
        }
        let (value, rest) = rest.split_at(len);
        self.input = rest;
        Ok(value)
    }
}

fn read_length(input: &[u8]) -> Result<(usize, &[u8]), OpaqueError> {
    let (&first, rest) = input
        .split_first()
        .ok_or_else(|| OpaqueError::from_display("missing DER length"))?;
    if first & HIGH_BIT == 0 {
        return Ok((usize::from(first), rest));
    }
    let count = usize::from(first & !HIGH_BIT);
    if count == 0 || count > size_of::<u32>() || rest.len() < count {
        return Err(OpaqueError::from_display("invalid DER length"));
    }
    let (len_bytes, rest) = rest.split_at(count);
    let len = len_bytes
        .iter()
        .fold(0usize, |len, b| (len << 8) | usize::from(*b));
    Ok((len, rest))
}
