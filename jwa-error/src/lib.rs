//! Error types and utilities used by jwa.
//!
//! The [`BoxError`] type is a type-erased error type that can be used to represent any error that
//! implements the `std::error::Error` trait. It is used at the boundary with the
//! cryptographic provider, where the concrete error type is not something
//! the algorithm layer cares about.
//!
//! [`JwaError`] is the error returned by every public jwa operation. Its
//! [`JwaErrorKind`] tells the caller what went wrong:
//!
//! - [`JwaErrorKind::NotSupported`]: no handler is registered for the (operation, algorithm) pair;
//! - [`JwaErrorKind::Data`]: malformed operation input (e.g. missing `key_ops`);
//! - [`JwaErrorKind::Validation`]: a malformed JWK;
//! - [`JwaErrorKind::Provider`]: opaque failure reported by the cryptographic provider.

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Alias for a type-erased error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

mod opaque;
pub use opaque::OpaqueError;

mod context;
pub use context::ErrorContext;

mod jwa;
pub use jwa::{JwaError, JwaErrorKind};
