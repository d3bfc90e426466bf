use super::{CompressedHashString, CompressedPbkdf2Config, Pbkdf2Config, derive_key};
use crate::codec;
use crate::config::ChfConfig;
use crate::error::{ChfError, Result};
use crate::hash::{DEFAULT_SALT_LENGTH, Hash, HashingFunction, Salt};
use crate::kdf::HashString;
use crate::verify;

/// PBKDF2 whose encoded hash is only `base64(digest)`. The salt has to be stored by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pbkdf2Function {
    config: Pbkdf2Config,
}

impl Pbkdf2Function {
    pub fn new(config: Pbkdf2Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn derive(&self, password: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        derive_key(
            password,
            salt,
            self.config.algorithm,
            self.config.iterations,
            self.config.derived_bits,
        )
    }
}

impl HashingFunction for Pbkdf2Function {
    fn hash(&self, password: &[u8]) -> Result<Hash> {
        let salt = Salt::generate_random(DEFAULT_SALT_LENGTH)?;
        self.hash_with_salt(password, salt.get())
    }

    fn hash_with_salt(&self, password: &[u8], salt: &[u8]) -> Result<Hash> {
        let digest = self.derive(password, salt)?;
        let encoded = codec::base64_encode(&digest);
        Ok(Hash::new(
            digest,
            encoded,
            Some(Salt::new(salt)),
            self.config(),
        ))
    }

    fn check(&self, _password: &[u8], _hashed: &str) -> Result<bool> {
        Err(ChfError::bad_parameters(
            "PBKDF2 hashes don't contain their salt, use check_with_salt",
        ))
    }

    fn check_with_salt(&self, password: &[u8], hashed: &str, salt: &[u8]) -> Result<bool> {
        let expected = codec::base64_decode(hashed)?;
        let actual = self.derive(password, salt)?;
        Ok(verify::equals(&actual, &expected))
    }

    fn config(&self) -> ChfConfig {
        ChfConfig::Pbkdf2(self.config)
    }
}

/// PBKDF2 with a self-describing hash string, see [`CompressedHashString`].
///
/// # Example
///
/// ```
/// use passhash::hash::HashingFunction;
/// use passhash::kdf::pbkdf2::{
///     CompressedPbkdf2Config, CompressedPbkdf2Function, HmacAlgorithm, Pbkdf2Config,
/// };
///
/// let function = CompressedPbkdf2Function::new(CompressedPbkdf2Config::new(Pbkdf2Config {
///     algorithm: HmacAlgorithm::Sha256,
///     iterations: 10_000,
///     derived_bits: 256,
/// }))
/// .unwrap();
/// let hash = function.hash_with_salt(b"password", b"abc").unwrap();
/// assert_eq!(
///     "$3$42949672960256$YWJj$/WTQfTTc8Hg8GlplP0LthpgdElUG+I3MyuvK8MI4MnQ=",
///     hash.encoded(),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedPbkdf2Function {
    config: CompressedPbkdf2Config,
}

impl CompressedPbkdf2Function {
    pub fn new(config: CompressedPbkdf2Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Decodes the configuration a compressed PBKDF2 hash string was produced with.
    pub fn config_from_hash(hashed: &str) -> Result<CompressedPbkdf2Config> {
        let parsed = CompressedHashString::decode(hashed)?;
        Ok(CompressedPbkdf2Config::new(parsed.config))
    }
}

impl HashingFunction for CompressedPbkdf2Function {
    fn hash(&self, password: &[u8]) -> Result<Hash> {
        let salt = Salt::generate_random(DEFAULT_SALT_LENGTH)?;
        self.hash_with_salt(password, salt.get())
    }

    fn hash_with_salt(&self, password: &[u8], salt: &[u8]) -> Result<Hash> {
        let pbkdf2 = self.config.pbkdf2;
        let digest = derive_key(
            password,
            salt,
            pbkdf2.algorithm,
            pbkdf2.iterations,
            pbkdf2.derived_bits,
        )?;
        let encoded = CompressedHashString {
            config: pbkdf2,
            salt: salt.to_vec(),
            digest,
            delimiter: self.config.delimiter,
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
        let stored = CompressedHashString::decode_with_delimiter(hashed, self.config.delimiter)?;
        let actual = derive_key(
            password,
            &stored.salt,
            stored.config.algorithm,
            stored.config.iterations,
            stored.config.derived_bits,
        )?;
        Ok(verify::equals(&actual, &stored.digest))
    }

    fn check_with_salt(&self, password: &[u8], hashed: &str, _salt: &[u8]) -> Result<bool> {
        self.check(password, hashed)
    }

    fn config(&self) -> ChfConfig {
        ChfConfig::CompressedPbkdf2(self.config)
    }
}
