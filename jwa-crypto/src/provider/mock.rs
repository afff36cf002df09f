//! Recording provider used to test dispatch without real cryptography.

use jwa_error::OpaqueError;
use parking_lot::Mutex;

use crate::jose::{AlgorithmDescriptor, KeyOperation, KeyUsages};
use crate::provider::{
    CryptoKey, CryptoProvider, GeneratedKey, KeyData, KeyFormat, KeyKind, KeyPair,
};

const SIGNATURE_PREFIX: &[u8] = b"sig:";
const TAG_BYTE: u8 = 0xaa;
pub(crate) const RANDOM_BYTE: u8 = 7;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MockCall {
    Sign(AlgorithmDescriptor),
    Verify(AlgorithmDescriptor),
    Encrypt(AlgorithmDescriptor),
    Decrypt(AlgorithmDescriptor),
    GenerateKey {
        alg: AlgorithmDescriptor,
        extractable: bool,
        usages: KeyUsages,
    },
    ImportKey {
        format: KeyFormat,
        alg: AlgorithmDescriptor,
        usages: KeyUsages,
    },
    ExportKey(KeyFormat),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MockKey {
    pub(crate) algorithm: AlgorithmDescriptor,
    pub(crate) usages: KeyUsages,
    pub(crate) extractable: bool,
    pub(crate) kind: KeyKind,
}

impl MockKey {
    pub(crate) fn new(algorithm: AlgorithmDescriptor, usages: impl Into<KeyUsages>) -> Self {
        Self {
            algorithm,
            usages: usages.into(),
            extractable: true,
            kind: KeyKind::Secret,
        }
    }
}

impl CryptoKey for MockKey {
    fn algorithm(&self) -> &AlgorithmDescriptor {
        &self.algorithm
    }

    fn usages(&self) -> &KeyUsages {
        &self.usages
    }

    fn extractable(&self) -> bool {
        self.extractable
    }

    fn kind(&self) -> KeyKind {
        self.kind
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockProvider {
    calls: Mutex<Vec<MockCall>>,
}

impl MockProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().push(call);
    }
}

fn tag_len(alg: &AlgorithmDescriptor) -> usize {
    match alg {
        AlgorithmDescriptor::AesGcm(params) => params.tag_len(),
        _ => 0,
    }
}

impl CryptoProvider for MockProvider {
    type Key = MockKey;
    type Error = OpaqueError;

    async fn sign(
        &self,
        alg: &AlgorithmDescriptor,
        _key: &MockKey,
        data: &[u8],
    ) -> Result<Vec<u8>, OpaqueError> {
        self.record(MockCall::Sign(alg.clone()));
        Ok([SIGNATURE_PREFIX, data].concat())
    }

    async fn verify(
        &self,
        alg: &AlgorithmDescriptor,
        _key: &MockKey,
        signature: &[u8],
        data: &[u8],
    ) -> Result<bool, OpaqueError> {
        self.record(MockCall::Verify(alg.clone()));
        Ok(signature == [SIGNATURE_PREFIX, data].concat())
    }

    async fn encrypt(
        &self,
        alg: &AlgorithmDescriptor,
        _key: &MockKey,
        data: &[u8],
    ) -> Result<Vec<u8>, OpaqueError> {
        self.record(MockCall::Encrypt(alg.clone()));
        let mut out = data.to_vec();
        out.extend(std::iter::repeat_n(TAG_BYTE, tag_len(alg)));
        Ok(out)
    }

    async fn decrypt(
        &self,
        alg: &AlgorithmDescriptor,
        _key: &MockKey,
        data: &[u8],
    ) -> Result<Vec<u8>, OpaqueError> {
        self.record(MockCall::Decrypt(alg.clone()));
        let split = data
            .len()
            .checked_sub(tag_len(alg))
            .ok_or_else(|| OpaqueError::from_display("ciphertext too short"))?;
        let (plaintext, tag) = data.split_at(split);
        if tag.iter().any(|b| *b != TAG_BYTE) {
            return Err(OpaqueError::from_display("tag mismatch"));
        }
        Ok(plaintext.to_vec())
    }

    async fn generate_key(
        &self,
        alg: &AlgorithmDescriptor,
        extractable: bool,
        usages: &KeyUsages,
    ) -> Result<GeneratedKey<MockKey>, OpaqueError> {
        self.record(MockCall::GenerateKey {
            alg: alg.clone(),
            extractable,
            usages: usages.clone(),
        });
        let key = MockKey {
            algorithm: alg.clone(),
            usages: usages.clone(),
            extractable,
            kind: KeyKind::Secret,
        };
        Ok(match alg {
            AlgorithmDescriptor::Hmac(_) | AlgorithmDescriptor::AesGcm(_) => {
                GeneratedKey::Secret(key)
            }
            AlgorithmDescriptor::Ecdsa(_) | AlgorithmDescriptor::RsassaPkcs1V15(_) => {
                GeneratedKey::Pair(KeyPair {
                    public_key: MockKey {
                        usages: KeyUsages::from([KeyOperation::Verify]),
                        extractable: true,
                        kind: KeyKind::Public,
                        ..key.clone()
                    },
                    private_key: MockKey {
                        kind: KeyKind::Private,
                        ..key
                    },
                })
            }
        })
    }

    async fn import_key(
        &self,
        format: KeyFormat,
        _data: &KeyData,
        alg: &AlgorithmDescriptor,
        extractable: bool,
        usages: &KeyUsages,
    ) -> Result<MockKey, OpaqueError> {
        self.record(MockCall::ImportKey {
            format,
            alg: alg.clone(),
            usages: usages.clone(),
        });
        Ok(MockKey {
            algorithm: alg.clone(),
            usages: usages.clone(),
            extractable,
            kind: KeyKind::Secret,
        })
    }

    async fn export_key(&self, format: KeyFormat, key: &MockKey) -> Result<KeyData, OpaqueError> {
        self.record(MockCall::ExportKey(format));
        if !key.extractable {
            return Err(OpaqueError::from_display("key is not extractable"));
        }
        Ok(KeyData::Bytes(Vec::new()))
    }

    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, OpaqueError> {
        Ok(vec![RANDOM_BYTE; len])
    }
}
