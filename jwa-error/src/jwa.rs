use std::fmt;

use crate::{BoxError, OpaqueError};

/// The error type returned by every jwa operation.
///
/// All failures, including the ones that can be detected before
/// the provider is reached, are returned through the same `Result`
/// of the async operation.
pub struct JwaError {
    kind: JwaErrorKind,
    inner: OpaqueError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The kind of error that [`JwaError`] represents.
pub enum JwaErrorKind {
    /// No handler is registered for the requested (operation, algorithm) pair.
    ///
    /// Recoverable: the caller may retry with a different algorithm.
    NotSupported,
    /// Malformed operation input, e.g. `generate_key` without `key_ops`.
    Data,
    /// Malformed JWK, e.g. duplicate `key_ops` or a forbidden `use`.
    Validation,
    /// Failure reported by the cryptographic provider, passed through as-is.
    Provider,
}

impl JwaErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::NotSupported => "not supported",
            Self::Data => "data error",
            Self::Validation => "validation error",
            Self::Provider => "provider error",
        }
    }
}

impl fmt::Display for JwaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JwaError {
    /// Create a [`JwaErrorKind::NotSupported`] error for the given operation and algorithm.
    pub fn not_supported(operation: impl fmt::Display, alg: impl fmt::Display) -> Self {
        Self {
            kind: JwaErrorKind::NotSupported,
            inner: OpaqueError::from_display(format!(
                "algorithm '{alg}' is not supported for operation '{operation}'"
            )),
        }
    }

    /// Create a [`JwaErrorKind::Data`] error.
    pub fn data(msg: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self {
            kind: JwaErrorKind::Data,
            inner: OpaqueError::from_display(msg),
        }
    }

    /// Create a [`JwaErrorKind::Validation`] error.
    pub fn validation(msg: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self {
            kind: JwaErrorKind::Validation,
            inner: OpaqueError::from_display(msg),
        }
    }

    /// Create a [`JwaErrorKind::Provider`] error wrapping the provider's own error.
    pub fn provider(error: impl Into<BoxError>) -> Self {
        Self {
            kind: JwaErrorKind::Provider,
            inner: OpaqueError::from_boxed(error.into()),
        }
    }

    /// Wrap an already type-erased error as the given kind.
    pub fn from_opaque(kind: JwaErrorKind, inner: OpaqueError) -> Self {
        Self { kind, inner }
    }

    /// The [`JwaErrorKind`] of this error.
    pub fn kind(&self) -> JwaErrorKind {
        self.kind
    }

    /// Returns true if this is a [`JwaErrorKind::NotSupported`] error.
    pub fn is_not_supported(&self) -> bool {
        self.kind == JwaErrorKind::NotSupported
    }

    /// Returns true if this is a [`JwaErrorKind::Data`] error.
    pub fn is_data(&self) -> bool {
        self.kind == JwaErrorKind::Data
    }

    /// Returns true if this is a [`JwaErrorKind::Validation`] error.
    pub fn is_validation(&self) -> bool {
        self.kind == JwaErrorKind::Validation
    }

    /// Returns true if this is a [`JwaErrorKind::Provider`] error.
    pub fn is_provider(&self) -> bool {
        self.kind == JwaErrorKind::Provider
    }

    /// Consume the error, returning the type-erased cause.
    pub fn into_inner(self) -> OpaqueError {
        self.inner
    }
}

impl fmt::Debug for JwaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwaError")
            .field("kind", &self.kind)
            .field("inner", &self.inner)
            .finish()
    }
}

impl fmt::Display for JwaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.inner)
    }
}

impl std::error::Error for JwaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}
