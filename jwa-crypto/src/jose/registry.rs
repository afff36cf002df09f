use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};

use jwa_error::JwaError;

use crate::jose::{
    AesGcm, Algorithm, Ecdsa, EllipticCurve, HashAlgorithm, Hmac, JWA, Operation,
    RsassaPkcs1V15, Unsecured,
};

const SIGNATURE_OPERATIONS: &[Operation] = &[
    Operation::Sign,
    Operation::Verify,
    Operation::GenerateKey,
    Operation::ImportKey,
];

const AEAD_OPERATIONS: &[Operation] = &[
    Operation::Encrypt,
    Operation::Decrypt,
    Operation::GenerateKey,
    Operation::ImportKey,
];

const UNSECURED_OPERATIONS: &[Operation] = &[Operation::Sign, Operation::Verify];

fn standard_table() -> Vec<(JWA, &'static [Operation], Algorithm)> {
    use EllipticCurve::{P256, P384, P521, Secp256k1};
    use HashAlgorithm::{Sha256, Sha384, Sha512};

    vec![
        (JWA::HS256, SIGNATURE_OPERATIONS, Algorithm::Hmac(Hmac::new(Sha256))),
        (JWA::HS384, SIGNATURE_OPERATIONS, Algorithm::Hmac(Hmac::new(Sha384))),
        (JWA::HS512, SIGNATURE_OPERATIONS, Algorithm::Hmac(Hmac::new(Sha512))),
        (
            JWA::RS256,
            SIGNATURE_OPERATIONS,
            Algorithm::RsassaPkcs1V15(RsassaPkcs1V15::new(Sha256)),
        ),
        (
            JWA::RS384,
            SIGNATURE_OPERATIONS,
            Algorithm::RsassaPkcs1V15(RsassaPkcs1V15::new(Sha384)),
        ),
        (
            JWA::RS512,
            SIGNATURE_OPERATIONS,
            Algorithm::RsassaPkcs1V15(RsassaPkcs1V15::new(Sha512)),
        ),
        (JWA::ES256, SIGNATURE_OPERATIONS, Algorithm::Ecdsa(Ecdsa::new(P256, Sha256))),
        (JWA::ES384, SIGNATURE_OPERATIONS, Algorithm::Ecdsa(Ecdsa::new(P384, Sha384))),
        (JWA::ES512, SIGNATURE_OPERATIONS, Algorithm::Ecdsa(Ecdsa::new(P521, Sha512))),
        (
            JWA::KS256,
            SIGNATURE_OPERATIONS,
            Algorithm::Ecdsa(Ecdsa::new(Secp256k1, Sha256)),
        ),
        (JWA::A128GCM, AEAD_OPERATIONS, Algorithm::AesGcm(AesGcm::new(128))),
        (JWA::A192GCM, AEAD_OPERATIONS, Algorithm::AesGcm(AesGcm::new(192))),
        (JWA::A256GCM, AEAD_OPERATIONS, Algorithm::AesGcm(AesGcm::new(256))),
        (JWA::None, UNSECURED_OPERATIONS, Algorithm::None(Unsecured)),
    ]
}

static STANDARD: LazyLock<Arc<AlgorithmRegistry>> = LazyLock::new(|| {
    let entries = standard_table()
        .into_iter()
        .flat_map(|(alg, operations, handler)| {
            let handler = Arc::new(handler);
            operations
                .iter()
                .map(move |operation| ((*operation, alg), handler.clone()))
        })
        .collect();
    Arc::new(AlgorithmRegistry { entries })
});

#[derive(Debug, Clone)]
/// Immutable table mapping (operation, algorithm) pairs onto their handler.
///
/// A registry is built once, through [`AlgorithmRegistry::builder`] or by using
/// [`AlgorithmRegistry::standard`], and can be shared freely between tasks:
/// lookups never lock.
pub struct AlgorithmRegistry {
    entries: HashMap<(Operation, JWA), Arc<Algorithm>>,
}

impl AlgorithmRegistry {
    /// The registry with every algorithm supported by this crate.
    ///
    /// | identifier | operations |
    /// |---|---|
    /// | `HS256` `HS384` `HS512` | sign, verify, generateKey, importKey |
    /// | `RS256` `RS384` `RS512` | sign, verify, generateKey, importKey |
    /// | `ES256` `ES384` `ES512` `KS256` | sign, verify, generateKey, importKey |
    /// | `A128GCM` `A192GCM` `A256GCM` | encrypt, decrypt, generateKey, importKey |
    /// | `none` | sign, verify |
    pub fn standard() -> Arc<Self> {
        STANDARD.clone()
    }

    /// Start building an empty registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Start building a registry that contains all entries of this one.
    pub fn to_builder(&self) -> RegistryBuilder {
        RegistryBuilder {
            entries: self.entries.clone(),
        }
    }

    /// Resolve the handler for the given operation and identifier.
    ///
    /// Unknown identifiers and pairs without a registered handler
    /// both result in a not supported error.
    pub fn normalize(
        &self,
        operation: Operation,
        identifier: &str,
    ) -> Result<Arc<Algorithm>, JwaError> {
        let alg = JWA::parse_for(operation, identifier).inspect_err(|_| {
            tracing::debug!(%operation, identifier, "unknown algorithm identifier");
        })?;
        match self.get(operation, alg) {
            Some(handler) => {
                tracing::trace!(%operation, %alg, "resolved algorithm handler");
                Ok(handler.clone())
            }
            None => {
                tracing::debug!(%operation, %alg, "no algorithm handler registered");
                Err(JwaError::not_supported(operation, alg))
            }
        }
    }

    pub fn get(&self, operation: Operation, alg: JWA) -> Option<&Arc<Algorithm>> {
        self.entries.get(&(operation, alg))
    }

    pub fn contains(&self, operation: Operation, alg: JWA) -> bool {
        self.entries.contains_key(&(operation, alg))
    }

    /// Identifiers registered for the given operation, in [`JWA::ALL`] order.
    pub fn algorithms(&self, operation: Operation) -> impl Iterator<Item = JWA> + '_ {
        JWA::ALL
            .into_iter()
            .filter(move |alg| self.contains(operation, *alg))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
/// Builder for an [`AlgorithmRegistry`].
pub struct RegistryBuilder {
    entries: HashMap<(Operation, JWA), Arc<Algorithm>>,
}

impl RegistryBuilder {
    /// Register `handler` for the given algorithm and operation.
    ///
    /// Fails if a handler is already registered for that pair.
    pub fn define(
        mut self,
        alg: JWA,
        operation: Operation,
        handler: impl Into<Arc<Algorithm>>,
    ) -> Result<Self, JwaError> {
        if self.entries.contains_key(&(operation, alg)) {
            return Err(JwaError::data(format!(
                "algorithm '{alg}' is already registered for operation '{operation}'"
            )));
        }
        self.entries.insert((operation, alg), handler.into());
        Ok(self)
    }

    /// Register one handler for several operations.
    pub fn define_all(
        mut self,
        alg: JWA,
        operations: &[Operation],
        handler: impl Into<Arc<Algorithm>>,
    ) -> Result<Self, JwaError> {
        let handler = handler.into();
        for operation in operations {
            self = self.define(alg, *operation, handler.clone())?;
        }
        Ok(self)
    }

    pub fn build(self) -> AlgorithmRegistry {
        AlgorithmRegistry {
            entries: self.entries,
        }
    }
}
