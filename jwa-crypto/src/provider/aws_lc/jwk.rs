//! Conversion between [`JWK`] and aws-lc key material.

use aws_lc_rs::{
    encoding::AsBigEndian as _,
    signature::{EcdsaKeyPair, KeyPair as _, RsaKeyPair},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jwa_error::{ErrorContext, OpaqueError};
use zeroize::Zeroizing;

use super::der::{self, RsaPrivateComponents};
use super::{AwsLcKey, KeyMaterial, ecdsa_signing};
use crate::jose::{AlgorithmDescriptor, EllipticCurve, JWK, JWKType};
use crate::provider::CryptoKey;

pub(super) fn import(alg: &AlgorithmDescriptor, jwk: &JWK) -> Result<KeyMaterial, OpaqueError> {
    match alg {
        AlgorithmDescriptor::Hmac(_) | AlgorithmDescriptor::AesGcm(_) => {
            expect_kty(jwk, JWKType::OCT)?;
            let k = member(jwk.k.as_deref(), "k")?;
            if k.is_empty() {
                return Err(OpaqueError::from_display("empty secret key"));
            }
            Ok(KeyMaterial::Secret(k))
        }
        AlgorithmDescriptor::Ecdsa(params) => {
            expect_kty(jwk, JWKType::EC)?;
            if jwk.crv != Some(params.named_curve) {
                return Err(OpaqueError::from_display(format!(
                    "jwk curve {:?} does not match {:?}",
                    jwk.crv, params.named_curve
                )));
            }
            let coordinate_len = params.named_curve.coordinate_len();
            let x = member(jwk.x.as_deref(), "x")?;
            let y = member(jwk.y.as_deref(), "y")?;
            if x.len() != coordinate_len || y.len() != coordinate_len {
                return Err(OpaqueError::from_display(format!(
                    "EC coordinates must be {coordinate_len} bytes"
                )));
            }
            let mut point = Vec::with_capacity(1 + 2 * coordinate_len);
            point.push(0x04);
            point.extend_from_slice(&x);
            point.extend_from_slice(&y);

            match jwk.d.as_deref() {
                Some(d) => {
                    let d = member(Some(d), "d")?;
                    let pair = EcdsaKeyPair::from_private_key_and_public_key(
                        ecdsa_signing(params)?,
                        &d,
                        &point,
                    )
                    .context("import EC private key")?;
                    Ok(KeyMaterial::EcPrivate(pair))
                }
                None => Ok(KeyMaterial::EcPublic(point)),
            }
        }
        AlgorithmDescriptor::RsassaPkcs1V15(_) => {
            expect_kty(jwk, JWKType::RSA)?;
            let n = member(jwk.n.as_deref(), "n")?;
            let e = member(jwk.e.as_deref(), "e")?;
            if jwk.d.is_none() {
                return Ok(KeyMaterial::RsaPublic(der::rsa_public_key(&n, &e)));
            }
            let d = member(jwk.d.as_deref(), "d")?;
            let p = member(jwk.p.as_deref(), "p")?;
            let q = member(jwk.q.as_deref(), "q")?;
            let dp = member(jwk.dp.as_deref(), "dp")?;
            let dq = member(jwk.dq.as_deref(), "dq")?;
            let qi = member(jwk.qi.as_deref(), "qi")?;
            let der = der::rsa_private_key(&RsaPrivateComponents {
                n: &n,
                e: &e,
                d: &d,
                p: &p,
                q: &q,
                dp: &dp,
                dq: &dq,
                qi: &qi,
            });
            let pair = RsaKeyPair::from_der(&der).context("import RSA private key")?;
            Ok(KeyMaterial::RsaPrivate(pair))
        }
    }
}

pub(super) fn export(key: &AwsLcKey) -> Result<JWK, OpaqueError> {
    let mut jwk = match (key.algorithm(), key.material()) {
        (_, KeyMaterial::Secret(secret)) => {
            let mut jwk = JWK::new(JWKType::OCT);
            jwk.k = Some(URL_SAFE_NO_PAD.encode(secret.as_slice()));
            jwk
        }
        (AlgorithmDescriptor::Ecdsa(params), KeyMaterial::EcPublic(point)) => {
            ec_public(params.named_curve, point)?
        }
        (AlgorithmDescriptor::Ecdsa(params), KeyMaterial::EcPrivate(pair)) => {
            let mut jwk = ec_public(params.named_curve, pair.public_key().as_ref())?;
            let d = pair
                .private_key()
                .as_be_bytes()
                .context("encode EC private key")?;
            jwk.d = Some(URL_SAFE_NO_PAD.encode(d.as_ref()));
            jwk
        }
        (_, KeyMaterial::RsaPublic(der)) => {
            let (n, e) = der::parse_rsa_public_key(der)?;
            let mut jwk = JWK::new(JWKType::RSA);
            jwk.n = Some(URL_SAFE_NO_PAD.encode(n));
            jwk.e = Some(URL_SAFE_NO_PAD.encode(e));
            jwk
        }
        (_, KeyMaterial::RsaPrivate(_)) => {
            return Err(OpaqueError::from_display(
                "RSA private keys cannot be exported as jwk",
            ));
        }
        (alg, _) => {
            return Err(OpaqueError::from_display(format!(
                "{} key material does not match its algorithm",
                alg.name()
            )));
        }
    };
    jwk.alg = key.algorithm().jwa().map(|alg| alg.as_str().to_owned());
    jwk.key_ops = Some(key.usages().as_slice().to_vec());
    jwk.ext = Some(key.extractable());
    Ok(jwk)
}

fn ec_public(curve: EllipticCurve, point: &[u8]) -> Result<JWK, OpaqueError> {
    let coordinates = match point.split_first() {
        Some((0x04, coordinates)) if coordinates.len() == 2 * curve.coordinate_len() => {
            coordinates
        }
        _ => {
            return Err(OpaqueError::from_display(
                "EC public key is not an uncompressed point",
            ));
        }
    };
    let (x, y) = coordinates.split_at(curve.coordinate_len());
    let mut jwk = JWK::new(JWKType::EC);
    jwk.crv = Some(curve);
    jwk.x = Some(URL_SAFE_NO_PAD.encode(x));
    jwk.y = Some(URL_SAFE_NO_PAD.encode(y));
    Ok(jwk)
}

fn expect_kty(jwk: &JWK, kty: JWKType) -> Result<(), OpaqueError> {
    if jwk.kty == kty {
        Ok(())
    } else {
        Err(OpaqueError::from_display(format!(
            "expected jwk of type {kty}, got {}",
            jwk.kty
        )))
    }
}

/// Decoded base64url member, zeroized on drop since it may hold private key material.
fn member(value: Option<&str>, name: &'static str) -> Result<Zeroizing<Vec<u8>>, OpaqueError> {
    let value = value.with_context(|| format!("jwk is missing member '{name}'"))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .with_context(|| format!("jwk member '{name}' is not valid base64url"))?;
    Ok(Zeroizing::new(bytes))
}
