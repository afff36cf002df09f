//! # JOSE: JSON Object Signing and Encryption
//!
//! JOSE is an IETF standard for securely transferring data between parties using JSON.
//! This module implements the algorithm layer of it:
//!
//! * JWA (JSON Web Algorithm): the list of algorithm identifiers (`HS256`, `ES256`,
//!   `A128GCM`, ...) and their semantics. Each identifier is registered per
//!   [`Operation`] in an immutable [`AlgorithmRegistry`], which maps it onto
//!   one of the [`Algorithm`] handlers. See [`rfc7518`] for more details.
//!
//! * JWK (JSON Web Key): a JSON format for representing cryptographic keys.
//!   Importing a [`JWK`] derives the key usages from its `use`, `key_ops` and
//!   private members and attaches the provider's key handle to it.
//!   See [`rfc7517`] for more details.
//!
//! The [`JWAFacade`] is the single entry point: it resolves the handler for the
//! requested operation and algorithm, validates the input and forwards to the
//! handler, which in turn calls the [`CryptoProvider`].
//!
//! [`rfc7517`]: https://datatracker.ietf.org/doc/html/rfc7517
//! [`rfc7518`]: https://datatracker.ietf.org/doc/html/rfc7518
//! [`CryptoProvider`]: crate::provider::CryptoProvider

mod jwa;
pub use jwa::{JWA, UnknownAlgorithm};

mod operation;
pub use operation::Operation;

mod descriptor;
pub use descriptor::{
    AesGcmParams, AlgorithmDescriptor, EcdsaParams, EllipticCurve, HashAlgorithm, HmacParams,
    RsaHashedParams,
};

mod input;
pub use input::{Input, Signature};

mod jwk;
pub use jwk::{ImportedJWK, JWK, JWKType, JWKUse, KeyOperation, KeyUsages};

mod validate;

mod algorithms;
pub use algorithms::{AesGcm, Algorithm, EncryptionResult, Ecdsa, Hmac, RsassaPkcs1V15, Unsecured};

mod registry;
pub use registry::{AlgorithmRegistry, RegistryBuilder};

mod facade;
pub use facade::{GenerateKeyOptions, JWAFacade};
