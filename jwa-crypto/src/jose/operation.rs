use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
/// The kind of operation an algorithm is resolved for.
///
/// The same identifier can be registered for several operations,
/// e.g. `HS256` for `sign`, `verify`, `generateKey` and `importKey`.
pub enum Operation {
    Sign,
    Verify,
    Encrypt,
    Decrypt,
    /// Key wrapping, e.g. `A128KW` or `RSA-OAEP`.
    EncryptKey,
    /// Key unwrapping.
    DecryptKey,
    /// Key agreement, e.g. `ECDH-ES` or `dir`.
    AgreeKey,
    GenerateKey,
    ImportKey,
    /// Exporting is not algorithm specific and never goes through the registry.
    ExportKey,
}

impl Operation {
    pub const ALL: [Self; 10] = [
        Self::Sign,
        Self::Verify,
        Self::Encrypt,
        Self::Decrypt,
        Self::EncryptKey,
        Self::DecryptKey,
        Self::AgreeKey,
        Self::GenerateKey,
        Self::ImportKey,
        Self::ExportKey,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sign => "sign",
            Self::Verify => "verify",
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
            Self::EncryptKey => "encryptKey",
            Self::DecryptKey => "decryptKey",
            Self::AgreeKey => "agreeKey",
            Self::GenerateKey => "generateKey",
            Self::ImportKey => "importKey",
            Self::ExportKey => "exportKey",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
