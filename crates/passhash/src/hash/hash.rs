use std::fmt::{self, Debug, Display};

use crate::codec;
use crate::config::ChfConfig;
use crate::hash::Salt;

/// The result of hashing a password.
///
/// [`Hash::encoded`] is the only artifact that needs to be stored. For the self-describing
/// formats (scrypt, compressed PBKDF2, Argon2, BCrypt) it contains the configuration and
/// the salt, so a later `check` needs nothing else. For digest-style functions the salt
/// is returned here and has to be kept by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct Hash {
    digest: Vec<u8>,
    encoded: String,
    salt: Option<Salt>,
    config: ChfConfig,
}

impl Hash {
    pub(crate) fn new(
        digest: Vec<u8>,
        encoded: String,
        salt: Option<Salt>,
        config: ChfConfig,
    ) -> Self {
        Self {
            digest,
            encoded,
            salt,
            config,
        }
    }

    /// The raw digest bytes.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// The encoded hash string to persist.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// The salt used, if any.
    pub fn salt(&self) -> Option<&Salt> {
        self.salt.as_ref()
    }

    /// The configuration of the function that produced this hash.
    pub fn config(&self) -> &ChfConfig {
        &self.config
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hash")
            .field("digest", &codec::hex_encode(&self.digest))
            .field("encoded", &self.encoded)
            .field("salt", &self.salt)
            .field("config", &self.config)
            .finish()
    }
}
