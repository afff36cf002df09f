//! JSON Web Algorithms (JWA) negotiation used by jwa.
//!
//! This crate resolves a caller supplied algorithm identifier and operation
//! kind to the matching algorithm handler, normalizes inputs and outputs the
//! way [`rfc7518`] expects them, and delegates the actual cryptographic work
//! to a [`CryptoProvider`](provider::CryptoProvider).
//!
//! - [`jose`]: identifiers, descriptors, JWK model, registry, handlers and the facade;
//! - [`provider`]: the provider contract and an [`aws-lc-rs`] backed implementation.
//!
//! [`rfc7518`]: https://datatracker.ietf.org/doc/html/rfc7518
//! [`aws-lc-rs`]: https://docs.rs/aws-lc-rs

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(clippy::print_stdout, clippy::dbg_macro))]

pub mod jose;
pub mod provider;

pub mod dep {
    //! Dependencies for jwa crypto modules.
    //!
    //! Exported for your convenience

    pub mod aws_lc_rs {
        //! Re-export of the [`aws-lc-rs`] crate.
        //!
        //! [`aws-lc-rs`]: https://docs.rs/aws-lc-rs

        #[doc(inline)]
        pub use aws_lc_rs::*;
    }

    pub mod serde_json {
        //! Re-export of the [`serde_json`] crate.
        //!
        //! [`serde_json`]: https://docs.rs/serde_json

        #[doc(inline)]
        pub use serde_json::*;
    }
}
