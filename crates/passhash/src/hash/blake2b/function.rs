use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use super::{MAX_DIGEST_LEN, blake2b};
use crate::codec;
use crate::config::ChfConfig;
use crate::error::{ChfError, Result};
use crate::hash::{Hash, HashingFunction, Salt, SaltOption};
use crate::verify;

/// Configuration of a [`Blake2bFunction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blake2bConfig {
    /// Digest length in bytes, 1 to 64.
    pub digest_length: usize,
    #[serde(default)]
    pub salt_option: SaltOption,
}

impl Blake2bConfig {
    pub const BLAKE2B_512: Self = Self {
        digest_length: 64,
        salt_option: SaltOption::Append,
    };

    pub const BLAKE2B_256: Self = Self {
        digest_length: 32,
        salt_option: SaltOption::Append,
    };

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DIGEST_LEN).contains(&self.digest_length) {
            return Err(ChfError::bad_parameters(format!(
                "BLAKE2b digest length must be between 1 and {MAX_DIGEST_LEN} but is {}",
                self.digest_length
            )));
        }
        Ok(())
    }
}

impl Display for Blake2bConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "blake2b[l={},salt={}]",
            self.digest_length, self.salt_option
        )
    }
}

/// BLAKE2b as a password hashing function. The encoded hash is the lowercase hex digest.
///
/// The salt, if any, is combined with the password according to the configured
/// [`SaltOption`] and is not recoverable from the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blake2bFunction {
    config: Blake2bConfig,
}

impl Blake2bFunction {
    pub fn new(config: Blake2bConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn digest(&self, password: &[u8], salt: Option<&[u8]>) -> Result<Vec<u8>> {
        match salt {
            Some(salt) => {
                let salted = self.config.salt_option.apply(password, salt);
                blake2b(self.config.digest_length, &[&salted])
            }
            None => blake2b(self.config.digest_length, &[password]),
        }
    }

    fn to_hash(&self, digest: Vec<u8>, salt: Option<&[u8]>) -> Hash {
        let encoded = codec::hex_encode(&digest);
        Hash::new(digest, encoded, salt.map(Salt::new), self.config())
    }

    fn verify(&self, password: &[u8], hashed: &str, salt: Option<&[u8]>) -> Result<bool> {
        let expected = codec::hex_decode(hashed)?;
        let actual = self.digest(password, salt)?;
        Ok(verify::equals(&actual, &expected))
    }
}

impl HashingFunction for Blake2bFunction {
    fn hash(&self, password: &[u8]) -> Result<Hash> {
        let digest = self.digest(password, None)?;
        Ok(self.to_hash(digest, None))
    }

    fn hash_with_salt(&self, password: &[u8], salt: &[u8]) -> Result<Hash> {
        let digest = self.digest(password, Some(salt))?;
        Ok(self.to_hash(digest, Some(salt)))
    }

    fn check(&self, password: &[u8], hashed: &str) -> Result<bool> {
        self.verify(password, hashed, None)
    }

    fn check_with_salt(&self, password: &[u8], hashed: &str, salt: &[u8]) -> Result<bool> {
        self.verify(password, hashed, Some(salt))
    }

    fn config(&self) -> ChfConfig {
        ChfConfig::Blake2b(self.config)
    }
}
