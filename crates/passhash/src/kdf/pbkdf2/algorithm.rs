use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{ChfError, Result};

/// The HMAC used as PBKDF2's pseudo random function.
///
/// The numeric [`code`](Self::code) is what the compressed hash string stores.
///
/// Configurations accept any name [`from_name`](Self::from_name) understands and serialize the
/// canonical one.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HmacAlgorithm {
    #[display("SHA1")]
    Sha1,
    #[display("SHA224")]
    Sha224,
    #[display("SHA256")]
    Sha256,
    #[display("SHA384")]
    Sha384,
    #[display("SHA512")]
    Sha512,
}

impl HmacAlgorithm {
    pub const ALL: [Self; 5] = [
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
    ];

    pub fn code(self) -> u32 {
        match self {
            Self::Sha1 => 1,
            Self::Sha224 => 2,
            Self::Sha256 => 3,
            Self::Sha384 => 4,
            Self::Sha512 => 5,
        }
    }

    /// Output length of the underlying digest in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::Sha1 => 160,
            Self::Sha224 => 224,
            Self::Sha256 => 256,
            Self::Sha384 => 384,
            Self::Sha512 => 512,
        }
    }

    /// # Errors
    ///
    /// [`ChfError::UnsupportedOperation`] for codes without an HMAC implementation.
    pub fn from_code(code: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.code() == code)
            .ok_or_else(|| ChfError::unsupported(format!("No HMAC algorithm with code {code}")))
    }

    /// Parses names like `SHA256`, `HmacSHA256` or `PBKDF2WithHmacSHA256`, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self> {
        let upper = name.to_ascii_uppercase().replace('-', "");
        let short = upper.strip_prefix("PBKDF2WITH").unwrap_or(&upper);
        let short = short.strip_prefix("HMAC").unwrap_or(short);
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.to_string() == short)
            .ok_or_else(|| ChfError::unsupported(format!("Unsupported HMAC algorithm `{name}`")))
    }
}

impl TryFrom<String> for HmacAlgorithm {
    type Error = ChfError;

    fn try_from(name: String) -> Result<Self> {
        Self::from_name(&name)
    }
}

impl From<HmacAlgorithm> for String {
    fn from(algorithm: HmacAlgorithm) -> Self {
        algorithm.to_string()
    }
}
