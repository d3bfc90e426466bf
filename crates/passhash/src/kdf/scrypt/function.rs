use super::{ScryptConfig, ScryptHashString, derive_key};
use crate::config::ChfConfig;
use crate::error::Result;
use crate::hash::{DEFAULT_SALT_LENGTH, Hash, HashingFunction, Salt};
use crate::kdf::HashString;
use crate::verify;

/// Scrypt as a password hashing function, producing [`ScryptHashString`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScryptFunction {
    config: ScryptConfig,
}

impl ScryptFunction {
    pub fn new(config: ScryptConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Bytes of memory one [`hash`](HashingFunction::hash) call allocates for the mixing step.
    pub fn required_memory(&self) -> u64 {
        self.config.required_memory()
    }

    /// Decodes the configuration a scrypt hash string was produced with.
    pub fn config_from_hash(hashed: &str) -> Result<ScryptConfig> {
        Ok(ScryptHashString::decode(hashed)?.config)
    }

    fn derive(password: &[u8], salt: &[u8], config: &ScryptConfig) -> Result<Vec<u8>> {
        derive_key(
            password,
            salt,
            config.work_factor,
            config.block_size,
            config.parallelism,
            config.derived_key_length,
        )
    }
}

impl HashingFunction for ScryptFunction {
    fn hash(&self, password: &[u8]) -> Result<Hash> {
        let salt = Salt::generate_random(DEFAULT_SALT_LENGTH)?;
        self.hash_with_salt(password, salt.get())
    }

    fn hash_with_salt(&self, password: &[u8], salt: &[u8]) -> Result<Hash> {
        let digest = Self::derive(password, salt, &self.config)?;
        let encoded = ScryptHashString {
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

    /// Re-derives with the parameters stored in `hashed`, which may differ from this instance's.
    fn check(&self, password: &[u8], hashed: &str) -> Result<bool> {
        let stored = ScryptHashString::decode(hashed)?;
        let actual = Self::derive(password, &stored.salt, &stored.config)?;
        Ok(verify::equals(&actual, &stored.digest))
    }

    fn check_with_salt(&self, password: &[u8], hashed: &str, _salt: &[u8]) -> Result<bool> {
        self.check(password, hashed)
    }

    fn config(&self) -> ChfConfig {
        ChfConfig::Scrypt(self.config)
    }
}
