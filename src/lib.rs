//! JSON Web Algorithms for the 🦀 Rust language.
//!
//! `jwa` resolves JOSE algorithm identifiers such as `HS256`, `ES384` or
//! `A256GCM` to an algorithm handler, normalizes inputs and outputs the way
//! [RFC 7518](https://datatracker.ietf.org/doc/html/rfc7518) expects them and
//! hands the actual cryptography to a pluggable provider.
//!
//! | crate | purpose |
//! |-|-|
//! | [`crypto`] | algorithm registry, [`JWAFacade`], JWK model and the [`AwsLcProvider`] |
//! | [`error`] | [`JwaError`] and the opaque error utilities used by providers |
//!
//! # Example
//!
//! ```
//! use jwa::crypto::jose::{GenerateKeyOptions, JWAFacade, KeyOperation};
//! use jwa::crypto::provider::AwsLcProvider;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), jwa::error::JwaError> {
//! let facade = JWAFacade::new(AwsLcProvider::new());
//!
//! let options = GenerateKeyOptions::for_key_ops(vec![KeyOperation::Sign, KeyOperation::Verify]);
//! let key = facade
//!     .generate_key("HS256", &options)
//!     .await?
//!     .into_secret()
//!     .ok_or_else(|| jwa::error::JwaError::data("expected a secret key"))?;
//!
//! let signature = facade.sign("HS256", &key, "hello").await?;
//! assert!(facade.verify("HS256", &key, &signature, "hello").await?);
//! # Ok(())
//! # }
//! ```
//!
//! [`JWAFacade`]: crate::crypto::jose::JWAFacade
//! [`AwsLcProvider`]: crate::crypto::provider::AwsLcProvider
//! [`JwaError`]: crate::error::JwaError

#![cfg_attr(docsrs, feature(doc_cfg))]

#[doc(inline)]
pub use ::jwa_crypto as crypto;

#[doc(inline)]
pub use ::jwa_error as error;
