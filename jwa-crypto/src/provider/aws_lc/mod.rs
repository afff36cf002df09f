//! [`CryptoProvider`] backed by [`aws_lc_rs`].

use aws_lc_rs::{
    aead::{self, Aad, LessSafeKey, Nonce, UnboundKey},
    hmac,
    rand::{SecureRandom, SystemRandom},
    rsa::KeySize,
    signature::{
        self, EcdsaKeyPair, EcdsaSigningAlgorithm, KeyPair as _, RsaEncoding, RsaKeyPair,
        UnparsedPublicKey, VerificationAlgorithm,
    },
};
use jwa_error::{ErrorContext, OpaqueError};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::jose::{
    AesGcmParams, AlgorithmDescriptor, EcdsaParams, EllipticCurve, HashAlgorithm, KeyOperation,
    KeyUsages, RsaHashedParams,
};
use crate::provider::{
    CryptoKey, CryptoProvider, GeneratedKey, KeyData, KeyFormat, KeyKind, KeyPair,
};

mod der;
mod jwk;
mod key;

pub use key::AwsLcKey;
use key::KeyMaterial;

#[derive(Debug, Clone)]
/// [`CryptoProvider`] implemented on top of [`aws_lc_rs`].
///
/// Supports HMAC, ECDSA (P-256, P-384, P-521 and secp256k1),
/// RSASSA-PKCS1-v1_5 and AES-GCM with 96 bit ivs and 128 bit tags.
///
/// Key generation runs on the calling task.
pub struct AwsLcProvider {
    rng: SystemRandom,
}

impl Default for AwsLcProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AwsLcProvider {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    fn random_secret(&self, len: usize) -> Result<Zeroizing<Vec<u8>>, OpaqueError> {
        let mut bytes = Zeroizing::new(vec![0; len]);
        self.rng
            .fill(bytes.as_mut_slice())
            .context("fill random key material")?;
        Ok(bytes)
    }

    fn generate_secret(
        &self,
        alg: &AlgorithmDescriptor,
        extractable: bool,
        usages: &KeyUsages,
    ) -> Result<GeneratedKey<AwsLcKey>, OpaqueError> {
        check_usages(alg, KeyKind::Secret, usages)?;
        let len = match alg {
            AlgorithmDescriptor::Hmac(params) => match params.length {
                Some(bits) if bits == 0 || !bits.is_multiple_of(8) => {
                    return Err(OpaqueError::from_display(format!(
                        "invalid HMAC key length: {bits} bits"
                    )));
                }
                Some(bits) => bits / 8,
                None => params.hash.block_len(),
            },
            AlgorithmDescriptor::AesGcm(params) => {
                aead_algorithm(params)?;
                params.length / 8
            }
            _ => return Err(mismatch(alg, "secret key")),
        };
        let secret = self.random_secret(len)?;
        Ok(GeneratedKey::Secret(AwsLcKey::new(
            alg.clone(),
            usages.clone(),
            extractable,
            KeyMaterial::Secret(secret),
        )))
    }

    fn generate_pair(
        &self,
        alg: &AlgorithmDescriptor,
        extractable: bool,
        usages: &KeyUsages,
    ) -> Result<GeneratedKey<AwsLcKey>, OpaqueError> {
        check_usages(alg, KeyKind::Private, usages)?;
        let (private, public) = match alg {
            AlgorithmDescriptor::Ecdsa(params) => {
                let pair = EcdsaKeyPair::generate(ecdsa_signing(params)?)
                    .context("generate ECDSA key pair")?;
                let point = pair.public_key().as_ref().to_vec();
                (KeyMaterial::EcPrivate(pair), KeyMaterial::EcPublic(point))
            }
            AlgorithmDescriptor::RsassaPkcs1V15(params) => {
                if params.public_exponent != RsaHashedParams::DEFAULT_PUBLIC_EXPONENT {
                    return Err(OpaqueError::from_display(format!(
                        "unsupported RSA public exponent: {}",
                        params.public_exponent
                    )));
                }
                let size = rsa_key_size(params.modulus_length)?;
                debug!(modulus_length = params.modulus_length, "generate RSA key pair");
                let pair = RsaKeyPair::generate(size).context("generate RSA key pair")?;
                let der = pair.public_key().as_ref().to_vec();
                (KeyMaterial::RsaPrivate(pair), KeyMaterial::RsaPublic(der))
            }
            _ => return Err(mismatch(alg, "key pair")),
        };

        let private_usages = usages.intersection(&KeyUsages::from([KeyOperation::Sign]));
        let public_usages = usages.intersection(&KeyUsages::from([KeyOperation::Verify]));
        Ok(GeneratedKey::Pair(KeyPair {
            public_key: AwsLcKey::new(alg.clone(), public_usages, true, public),
            private_key: AwsLcKey::new(alg.clone(), private_usages, extractable, private),
        }))
    }
}

impl CryptoProvider for AwsLcProvider {
    type Key = AwsLcKey;
    type Error = OpaqueError;

    async fn sign(
        &self,
        alg: &AlgorithmDescriptor,
        key: &AwsLcKey,
        data: &[u8],
    ) -> Result<Vec<u8>, OpaqueError> {
        check_key(key, alg, KeyOperation::Sign)?;
        match (alg, key.material()) {
            (AlgorithmDescriptor::Hmac(params), KeyMaterial::Secret(secret)) => {
                let key = hmac::Key::new(hmac_algorithm(params.hash), secret);
                Ok(hmac::sign(&key, data).as_ref().to_vec())
            }
            (AlgorithmDescriptor::Ecdsa(_), KeyMaterial::EcPrivate(pair)) => {
                let signature = pair.sign(&self.rng, data).context("ECDSA sign")?;
                Ok(signature.as_ref().to_vec())
            }
            (AlgorithmDescriptor::RsassaPkcs1V15(params), KeyMaterial::RsaPrivate(pair)) => {
                let mut signature = vec![0; pair.public_modulus_len()];
                pair.sign(rsa_encoding(params.hash), &self.rng, data, &mut signature)
                    .context("RSASSA-PKCS1-v1_5 sign")?;
                Ok(signature)
            }
            _ => Err(mismatch(alg, "signing")),
        }
    }

    async fn verify(
        &self,
        alg: &AlgorithmDescriptor,
        key: &AwsLcKey,
        signature: &[u8],
        data: &[u8],
    ) -> Result<bool, OpaqueError> {
        check_key(key, alg, KeyOperation::Verify)?;
        if let (AlgorithmDescriptor::Hmac(params), KeyMaterial::Secret(secret)) =
            (alg, key.material())
        {
            let key = hmac::Key::new(hmac_algorithm(params.hash), secret);
            return Ok(hmac::verify(&key, data, signature).is_ok());
        }

        let public_key = key
            .material()
            .public_key()
            .context("key has no public component")?;
        let verification = verification_algorithm(alg)?;
        let verified = UnparsedPublicKey::new(verification, public_key)
            .verify(data, signature)
            .is_ok();
        trace!(alg = alg.name(), verified, "signature verified");
        Ok(verified)
    }

    async fn encrypt(
        &self,
        alg: &AlgorithmDescriptor,
        key: &AwsLcKey,
        data: &[u8],
    ) -> Result<Vec<u8>, OpaqueError> {
        check_key(key, alg, KeyOperation::Encrypt)?;
        let (params, key) = aead_key(alg, key)?;
        let nonce = aead_nonce(params)?;
        let mut in_out = data.to_vec();
        key.seal_in_place_append_tag(
            nonce,
            Aad::from(params.additional_data.as_deref().unwrap_or_default()),
            &mut in_out,
        )
        .context("AES-GCM encrypt")?;
        Ok(in_out)
    }

    async fn decrypt(
        &self,
        alg: &AlgorithmDescriptor,
        key: &AwsLcKey,
        data: &[u8],
    ) -> Result<Vec<u8>, OpaqueError> {
        check_key(key, alg, KeyOperation::Decrypt)?;
        let (params, key) = aead_key(alg, key)?;
        let nonce = aead_nonce(params)?;
        let mut in_out = data.to_vec();
        let plaintext_len = key
            .open_in_place(
                nonce,
                Aad::from(params.additional_data.as_deref().unwrap_or_default()),
                &mut in_out,
            )
            .context("AES-GCM decrypt")?
            .len();
        in_out.truncate(plaintext_len);
        Ok(in_out)
    }

    async fn generate_key(
        &self,
        alg: &AlgorithmDescriptor,
        extractable: bool,
        usages: &KeyUsages,
    ) -> Result<GeneratedKey<AwsLcKey>, OpaqueError> {
        match alg {
            AlgorithmDescriptor::Hmac(_) | AlgorithmDescriptor::AesGcm(_) => {
                self.generate_secret(alg, extractable, usages)
            }
            AlgorithmDescriptor::Ecdsa(_) | AlgorithmDescriptor::RsassaPkcs1V15(_) => {
                self.generate_pair(alg, extractable, usages)
            }
        }
    }

    async fn import_key(
        &self,
        format: KeyFormat,
        data: &KeyData,
        alg: &AlgorithmDescriptor,
        extractable: bool,
        usages: &KeyUsages,
    ) -> Result<AwsLcKey, OpaqueError> {
        let material = match (format, data) {
            (KeyFormat::Raw, KeyData::Bytes(bytes)) => import_raw(alg, bytes)?,
            (KeyFormat::Pkcs8, KeyData::Bytes(der)) => import_pkcs8(alg, der)?,
            (KeyFormat::Jwk, KeyData::Jwk(jwk)) => jwk::import(alg, jwk)?,
            (format, _) => {
                return Err(OpaqueError::from_display(format!(
                    "unsupported {format} import for {}",
                    alg.name()
                )));
            }
        };
        check_usages(alg, material.kind(), usages)?;
        if let (AlgorithmDescriptor::AesGcm(params), KeyMaterial::Secret(secret)) =
            (alg, &material)
        {
            if secret.len() * 8 != params.length {
                return Err(OpaqueError::from_display(format!(
                    "AES key of {} bits does not match AES-{}",
                    secret.len() * 8,
                    params.length
                )));
            }
        }

        let alg = match (alg, &material) {
            (AlgorithmDescriptor::RsassaPkcs1V15(params), material) => {
                AlgorithmDescriptor::RsassaPkcs1V15(RsaHashedParams {
                    modulus_length: rsa_modulus_bits(material)?,
                    ..params.clone()
                })
            }
            (alg, _) => alg.clone(),
        };
        trace!(alg = alg.name(), %format, kind = ?material.kind(), "key imported");
        let extractable = extractable || material.kind() == KeyKind::Public;
        Ok(AwsLcKey::new(alg, usages.clone(), extractable, material))
    }

    async fn export_key(&self, format: KeyFormat, key: &AwsLcKey) -> Result<KeyData, OpaqueError> {
        if !key.extractable() {
            return Err(OpaqueError::from_display("key is not extractable"));
        }
        match (format, key.material()) {
            (KeyFormat::Raw, KeyMaterial::Secret(secret)) => Ok(KeyData::Bytes(secret.to_vec())),
            (KeyFormat::Raw, KeyMaterial::EcPublic(point)) => Ok(KeyData::Bytes(point.clone())),
            (KeyFormat::Pkcs8, KeyMaterial::EcPrivate(pair)) => {
                let document = pair.to_pkcs8v1().context("encode ECDSA key as pkcs8")?;
                Ok(KeyData::Bytes(document.as_ref().to_vec()))
            }
            (KeyFormat::Jwk, _) => Ok(KeyData::from(jwk::export(key)?)),
            (format, _) => Err(OpaqueError::from_display(format!(
                "unsupported {format} export for {:?} {} key",
                key.kind(),
                key.algorithm().name()
            ))),
        }
    }

    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, OpaqueError> {
        let mut bytes = vec![0; len];
        self.rng.fill(&mut bytes).context("fill random bytes")?;
        Ok(bytes)
    }
}

fn mismatch(alg: &AlgorithmDescriptor, what: &str) -> OpaqueError {
    OpaqueError::from_display(format!("{} key cannot be used for {what}", alg.name()))
}

/// The key must allow `op` and have been created for the same algorithm.
fn check_key(
    key: &AwsLcKey,
    alg: &AlgorithmDescriptor,
    op: KeyOperation,
) -> Result<(), OpaqueError> {
    if !key.usages().contains(op) {
        return Err(OpaqueError::from_display(format!(
            "key usages do not permit '{op}'"
        )));
    }
    let compatible = match (key.algorithm(), alg) {
        (AlgorithmDescriptor::Hmac(a), AlgorithmDescriptor::Hmac(b)) => a.hash == b.hash,
        (AlgorithmDescriptor::Ecdsa(a), AlgorithmDescriptor::Ecdsa(b)) => a == b,
        (AlgorithmDescriptor::RsassaPkcs1V15(a), AlgorithmDescriptor::RsassaPkcs1V15(b)) => {
            a.hash == b.hash
        }
        (AlgorithmDescriptor::AesGcm(a), AlgorithmDescriptor::AesGcm(b)) => a.length == b.length,
        _ => false,
    };
    if compatible {
        Ok(())
    } else {
        Err(OpaqueError::from_display(format!(
            "key algorithm {:?} does not match {:?}",
            key.algorithm(),
            alg
        )))
    }
}

fn check_usages(
    alg: &AlgorithmDescriptor,
    kind: KeyKind,
    usages: &KeyUsages,
) -> Result<(), OpaqueError> {
    let allowed: &[KeyOperation] = match (alg, kind) {
        (AlgorithmDescriptor::AesGcm(_), _) => &[
            KeyOperation::Encrypt,
            KeyOperation::Decrypt,
            KeyOperation::WrapKey,
            KeyOperation::UnwrapKey,
        ],
        (_, KeyKind::Public) => &[KeyOperation::Verify],
        _ => &[KeyOperation::Sign, KeyOperation::Verify],
    };
    if let Some(op) = usages.iter().find(|op| !allowed.contains(op)) {
        return Err(OpaqueError::from_display(format!(
            "'{op}' is not a valid usage for a {} {:?} key",
            alg.name(),
            kind
        )));
    }
    if kind != KeyKind::Public && usages.is_empty() {
        return Err(OpaqueError::from_display(format!(
            "{:?} {} key requires at least one usage",
            kind,
            alg.name()
        )));
    }
    if kind == KeyKind::Private
        && matches!(alg, AlgorithmDescriptor::Ecdsa(_) | AlgorithmDescriptor::RsassaPkcs1V15(_))
        && !usages.contains(KeyOperation::Sign)
    {
        return Err(OpaqueError::from_display(
            "private key usages must include 'sign'",
        ));
    }
    Ok(())
}

fn hmac_algorithm(hash: HashAlgorithm) -> hmac::Algorithm {
    match hash {
        HashAlgorithm::Sha256 => hmac::HMAC_SHA256,
        HashAlgorithm::Sha384 => hmac::HMAC_SHA384,
        HashAlgorithm::Sha512 => hmac::HMAC_SHA512,
    }
}

fn ecdsa_signing(
    params: &EcdsaParams,
) -> Result<&'static EcdsaSigningAlgorithm, OpaqueError> {
    match (params.named_curve, params.hash) {
        (EllipticCurve::P256, HashAlgorithm::Sha256) => {
            Ok(&signature::ECDSA_P256_SHA256_FIXED_SIGNING)
        }
        (EllipticCurve::P384, HashAlgorithm::Sha384) => {
            Ok(&signature::ECDSA_P384_SHA384_FIXED_SIGNING)
        }
        (EllipticCurve::P521, HashAlgorithm::Sha512) => {
            Ok(&signature::ECDSA_P521_SHA512_FIXED_SIGNING)
        }
        (EllipticCurve::Secp256k1, HashAlgorithm::Sha256) => {
            Ok(&signature::ECDSA_P256K1_SHA256_FIXED_SIGNING)
        }
        (curve, hash) => Err(OpaqueError::from_display(format!(
            "unsupported ECDSA combination {curve:?} with {hash:?}"
        ))),
    }
}

fn verification_algorithm(
    alg: &AlgorithmDescriptor,
) -> Result<&'static dyn VerificationAlgorithm, OpaqueError> {
    match alg {
        AlgorithmDescriptor::Ecdsa(params) => match (params.named_curve, params.hash) {
            (EllipticCurve::P256, HashAlgorithm::Sha256) => Ok(&signature::ECDSA_P256_SHA256_FIXED),
            (EllipticCurve::P384, HashAlgorithm::Sha384) => Ok(&signature::ECDSA_P384_SHA384_FIXED),
            (EllipticCurve::P521, HashAlgorithm::Sha512) => Ok(&signature::ECDSA_P521_SHA512_FIXED),
            (EllipticCurve::Secp256k1, HashAlgorithm::Sha256) => {
                Ok(&signature::ECDSA_P256K1_SHA256_FIXED)
            }
            (curve, hash) => Err(OpaqueError::from_display(format!(
                "unsupported ECDSA combination {curve:?} with {hash:?}"
            ))),
        },
        AlgorithmDescriptor::RsassaPkcs1V15(params) => Ok(match params.hash {
            HashAlgorithm::Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            HashAlgorithm::Sha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            HashAlgorithm::Sha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
        }),
        alg => Err(mismatch(alg, "public key verification")),
    }
}

fn rsa_encoding(hash: HashAlgorithm) -> &'static dyn RsaEncoding {
    match hash {
        HashAlgorithm::Sha256 => &signature::RSA_PKCS1_SHA256,
        HashAlgorithm::Sha384 => &signature::RSA_PKCS1_SHA384,
        HashAlgorithm::Sha512 => &signature::RSA_PKCS1_SHA512,
    }
}

fn rsa_key_size(modulus_length: usize) -> Result<KeySize, OpaqueError> {
    match modulus_length {
        2048 => Ok(KeySize::Rsa2048),
        3072 => Ok(KeySize::Rsa3072),
        4096 => Ok(KeySize::Rsa4096),
        8192 => Ok(KeySize::Rsa8192),
        other => Err(OpaqueError::from_display(format!(
            "unsupported RSA modulus length: {other} bits"
        ))),
    }
}

fn rsa_modulus_bits(material: &KeyMaterial) -> Result<usize, OpaqueError> {
    match material {
        KeyMaterial::RsaPrivate(pair) => Ok(pair.public_modulus_len() * 8),
        KeyMaterial::RsaPublic(der) => Ok(der::parse_rsa_public_key(der)?.0.len() * 8),
        _ => Err(OpaqueError::from_display("not an RSA key")),
    }
}

fn aead_algorithm(params: &AesGcmParams) -> Result<&'static aead::Algorithm, OpaqueError> {
    match params.length {
        128 => Ok(&aead::AES_128_GCM),
        192 => Ok(&aead::AES_192_GCM),
        256 => Ok(&aead::AES_256_GCM),
        other => Err(OpaqueError::from_display(format!(
            "unsupported AES key length: {other} bits"
        ))),
    }
}

fn aead_key<'a>(
    alg: &'a AlgorithmDescriptor,
    key: &AwsLcKey,
) -> Result<(&'a AesGcmParams, LessSafeKey), OpaqueError> {
    let (AlgorithmDescriptor::AesGcm(params), KeyMaterial::Secret(secret)) = (alg, key.material())
    else {
        return Err(mismatch(alg, "AES-GCM"));
    };
    if params.tag_len() != aead::MAX_TAG_LEN {
        return Err(OpaqueError::from_display(format!(
            "unsupported AES-GCM tag length: {} bits",
            params.tag_len() * 8
        )));
    }
    let unbound = UnboundKey::new(aead_algorithm(params)?, secret).context("create AES-GCM key")?;
    Ok((params, LessSafeKey::new(unbound)))
}

fn aead_nonce(params: &AesGcmParams) -> Result<Nonce, OpaqueError> {
    let iv = params.iv.as_deref().context("AES-GCM requires an iv")?;
    Nonce::try_assume_unique_for_key(iv).context("AES-GCM requires a 96 bit iv")
}

fn import_raw(alg: &AlgorithmDescriptor, bytes: &[u8]) -> Result<KeyMaterial, OpaqueError> {
    match alg {
        AlgorithmDescriptor::Hmac(_) | AlgorithmDescriptor::AesGcm(_) if !bytes.is_empty() => {
            Ok(KeyMaterial::Secret(Zeroizing::new(bytes.to_vec())))
        }
        AlgorithmDescriptor::Ecdsa(params) => {
            let coordinate_len = params.named_curve.coordinate_len();
            if bytes.first() != Some(&0x04) || bytes.len() != 1 + 2 * coordinate_len {
                return Err(OpaqueError::from_display(
                    "raw EC public key must be an uncompressed point",
                ));
            }
            Ok(KeyMaterial::EcPublic(bytes.to_vec()))
        }
        alg => Err(OpaqueError::from_display(format!(
            "unsupported raw import for {}",
            alg.name()
        ))),
    }
}

fn import_pkcs8(alg: &AlgorithmDescriptor, der: &[u8]) -> Result<KeyMaterial, OpaqueError> {
    match alg {
        AlgorithmDescriptor::Ecdsa(params) => {
            let pair = EcdsaKeyPair::from_pkcs8(ecdsa_signing(params)?, der)
                .context("parse pkcs8 ECDSA key")?;
            Ok(KeyMaterial::EcPrivate(pair))
        }
        AlgorithmDescriptor::RsassaPkcs1V15(_) => {
            let pair = RsaKeyPair::from_pkcs8(der).context("parse pkcs8 RSA key")?;
            Ok(KeyMaterial::RsaPrivate(pair))
        }
        alg => Err(OpaqueError::from_display(format!(
            "unsupported pkcs8 import for {}",
            alg.name()
        ))),
    }
}
