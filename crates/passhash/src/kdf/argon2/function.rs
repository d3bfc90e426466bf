use std::fmt::{self, Debug};
use zeroize::Zeroizing;

use super::{Argon2Config, Argon2HashString, Argon2Input, derive_key};
use crate::config::ChfConfig;
use crate::error::Result;
use crate::hash::{DEFAULT_SALT_LENGTH, Hash, HashingFunction, Salt};
use crate::kdf::HashString;
use crate::verify;

/// Argon2 as a password hashing function, producing [`Argon2HashString`]s.
///
/// An optional secret key `K` and associated data `X` are mixed into every derivation.
/// Neither appears in the hash string, so a hash produced with them only verifies on an
/// instance that carries the same values.
#[derive(Clone, PartialEq, Eq)]
pub struct Argon2Function {
    config: Argon2Config,
    secret: Zeroizing<Vec<u8>>,
    associated_data: Vec<u8>,
}

impl Argon2Function {
    /// Memory below the minimum for the configured parallelism is raised to it.
    pub fn new(config: Argon2Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.with_minimum_memory(),
            secret: Zeroizing::new(Vec::new()),
            associated_data: Vec::new(),
        })
    }

    pub fn with_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = Zeroizing::new(secret.into());
        self
    }

    pub fn with_associated_data(mut self, associated_data: impl Into<Vec<u8>>) -> Self {
        self.associated_data = associated_data.into();
        self
    }

    /// Bytes of block memory one [`hash`](HashingFunction::hash) call allocates.
    pub fn required_memory(&self) -> u64 {
        self.config.required_memory()
    }

    /// Decodes the configuration an Argon2 hash string was produced with.
    pub fn config_from_hash(hashed: &str) -> Result<Argon2Config> {
        Ok(Argon2HashString::decode(hashed)?.config)
    }

    fn derive(&self, password: &[u8], salt: &[u8], config: &Argon2Config) -> Result<Vec<u8>> {
        let input = Argon2Input {
            password,
            salt,
            secret: &self.secret,
            associated_data: &self.associated_data,
        };
        derive_key(&input, config)
    }
}

impl HashingFunction for Argon2Function {
    fn hash(&self, password: &[u8]) -> Result<Hash> {
        let salt = Salt::generate_random(DEFAULT_SALT_LENGTH)?;
        self.hash_with_salt(password, salt.get())
    }

    fn hash_with_salt(&self, password: &[u8], salt: &[u8]) -> Result<Hash> {
        let digest = self.derive(password, salt, &self.config)?;
        let encoded = Argon2HashString {
            config: self.config,
            salt: salt.to_vec(),
            digest,
        };
        Ok(Hash::new(
            encoded.digest.clone(),
            encoded.encode(),
            Some(Salt::new(salt)),
            self.config(),
        ))
    }

    /// Re-derives with the parameters stored in `hashed` and this instance's secret and associated data.
    fn check(&self, password: &[u8], hashed: &str) -> Result<bool> {
        let stored = Argon2HashString::decode(hashed)?;
        let actual = self.derive(password, &stored.salt, &stored.config)?;
        Ok(verify::equals(&actual, &stored.digest))
    }

    fn check_with_salt(&self, password: &[u8], hashed: &str, _salt: &[u8]) -> Result<bool> {
        self.check(password, hashed)
    }

    fn config(&self) -> ChfConfig {
        ChfConfig::Argon2(self.config)
    }
}

impl Debug for Argon2Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2Function")
            .field("config", &self.config)
            .field("has_secret", &!self.secret.is_empty())
            .field("associated_data", &hex::encode(&self.associated_data))
            .finish()
    }
}
