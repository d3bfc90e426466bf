//! The configuration of every hashing function family in one serializable value.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::sync::Arc;

use crate::error::{ChfError, Result};
use crate::hash::HashingFunction;
use crate::hash::blake2b::{Blake2bConfig, Blake2bFunction};
use crate::hash::digest::{MessageDigestConfig, MessageDigestFunction};
use crate::kdf::argon2::{Argon2Config, Argon2Function};
#[cfg(feature = "bcrypt")]
use crate::kdf::bcrypt::{BcryptConfig, BcryptFunction};
use crate::kdf::pbkdf2::{
    CompressedPbkdf2Config, CompressedPbkdf2Function, Pbkdf2Config, Pbkdf2Function,
};
use crate::kdf::scrypt::{ScryptConfig, ScryptFunction};

/// Configuration of a hashing function, tagged with its family.
///
/// The [`Display`] form is canonical: two configurations are equal iff their strings are,
/// which makes it usable as cache key (see [`ChfConfig::key`]).
///
/// # Example
///
/// ```
/// use passhash::ChfConfig;
/// use passhash::kdf::scrypt::ScryptConfig;
///
/// let config: ChfConfig = serde_json::from_str(
///     r#"{"function": "scrypt", "work_factor": 1024, "block_size": 1, "parallelism": 2, "derived_key_length": 32}"#,
/// )
/// .unwrap();
/// assert_eq!(ChfConfig::Scrypt(ScryptConfig::TEST), config);
/// assert_eq!("scrypt[N=1024,r=1,p=2,l=32]", config.key());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "kebab-case")]
pub enum ChfConfig {
    Scrypt(ScryptConfig),
    Pbkdf2(Pbkdf2Config),
    CompressedPbkdf2(CompressedPbkdf2Config),
    Argon2(Argon2Config),
    Blake2b(Blake2bConfig),
    MessageDigest(MessageDigestConfig),
    #[cfg(feature = "bcrypt")]
    Bcrypt(BcryptConfig),
}

impl ChfConfig {
    /// The canonical string form.
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Scrypt(config) => config.validate(),
            Self::Pbkdf2(config) => config.validate(),
            Self::CompressedPbkdf2(config) => config.validate(),
            Self::Argon2(config) => config.validate(),
            Self::Blake2b(config) => config.validate(),
            Self::MessageDigest(_) => Ok(()),
            #[cfg(feature = "bcrypt")]
            Self::Bcrypt(config) => config.validate(),
        }
    }

    /// Recovers the configuration from a self-describing hash string.
    ///
    /// The family is recognized by its prefix: `$argon2` for Argon2, `$2a$`/`$2b$`/`$2x$`/`$2y$`
    /// for BCrypt, `$s0$` or four fields for scrypt, and five fields for compressed PBKDF2
    /// with the default delimiter. Digest-style hashes carry no configuration and can't be
    /// recovered.
    ///
    /// # Errors
    ///
    /// [`ChfError::BadParameters`] if the string matches no family or fails to decode.
    pub fn from_hash(hashed: &str) -> Result<Self> {
        if hashed.starts_with("$argon2") {
            return Ok(Argon2Function::config_from_hash(hashed)?.into());
        }
        #[cfg(feature = "bcrypt")]
        if crate::kdf::bcrypt::has_bcrypt_prefix(hashed) {
            return Ok(BcryptFunction::config_from_hash(hashed)?.into());
        }
        match hashed.split('$').count() {
            5 if hashed.starts_with("$s0$") => Ok(ScryptFunction::config_from_hash(hashed)?.into()),
            4 => Ok(ScryptFunction::config_from_hash(hashed)?.into()),
            5 => Ok(CompressedPbkdf2Function::config_from_hash(hashed)?.into()),
            _ => Err(ChfError::invalid_hash("self-describing", hashed)),
        }
    }

    /// Constructs a hashing function for this configuration.
    pub fn build(&self) -> Result<Arc<dyn HashingFunction>> {
        Ok(match *self {
            Self::Scrypt(config) => Arc::new(ScryptFunction::new(config)?),
            Self::Pbkdf2(config) => Arc::new(Pbkdf2Function::new(config)?),
            Self::CompressedPbkdf2(config) => Arc::new(CompressedPbkdf2Function::new(config)?),
            Self::Argon2(config) => Arc::new(Argon2Function::new(config)?),
            Self::Blake2b(config) => Arc::new(Blake2bFunction::new(config)?),
            Self::MessageDigest(config) => Arc::new(MessageDigestFunction::new(config)),
            #[cfg(feature = "bcrypt")]
            Self::Bcrypt(config) => Arc::new(BcryptFunction::new(config)?),
        })
    }
}

macro_rules! impl_from_config {
    ($($variant:ident($config:ty)),* $(,)?) => {
        $(
            impl From<$config> for ChfConfig {
                fn from(config: $config) -> Self {
                    Self::$variant(config)
                }
            }
        )*
    };
}

impl_from_config!(
    Scrypt(ScryptConfig),
    Pbkdf2(Pbkdf2Config),
    CompressedPbkdf2(CompressedPbkdf2Config),
    Argon2(Argon2Config),
    Blake2b(Blake2bConfig),
    MessageDigest(MessageDigestConfig),
);
#[cfg(feature = "bcrypt")]
impl_from_config!(Bcrypt(BcryptConfig));

impl Display for ChfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scrypt(config) => config.fmt(f),
            Self::Pbkdf2(config) => config.fmt(f),
            Self::CompressedPbkdf2(config) => config.fmt(f),
            Self::Argon2(config) => config.fmt(f),
            Self::Blake2b(config) => config.fmt(f),
            Self::MessageDigest(config) => config.fmt(f),
            #[cfg(feature = "bcrypt")]
            Self::Bcrypt(config) => config.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::hash::SaltOption;
    use crate::hash::digest::DigestAlgorithm;
    use crate::kdf::argon2::{Variant, Version};
    use crate::kdf::pbkdf2::HmacAlgorithm;

    fn all_test_configs() -> Vec<ChfConfig> {
        vec![
            ScryptConfig::TEST.into(),
            Pbkdf2Config::TEST.into(),
            CompressedPbkdf2Config::new(Pbkdf2Config::TEST).into(),
            Argon2Config::TEST.into(),
            Blake2bConfig::BLAKE2B_512.into(),
            MessageDigestConfig::SHA512.into(),
            #[cfg(feature = "bcrypt")]
            BcryptConfig::TEST.into(),
        ]
    }

    #[test]
    fn keys_are_distinct() {
        let configs = all_test_configs();
        let keys: std::collections::HashSet<String> = configs.iter().map(ChfConfig::key).collect();
        assert_eq!(configs.len(), keys.len());
    }

    #[test]
    fn keys_distinguish_parameters() {
        assert_ne!(
            ChfConfig::from(Blake2bConfig::BLAKE2B_512).key(),
            ChfConfig::from(Blake2bConfig {
                salt_option: SaltOption::Prepend,
                ..Blake2bConfig::BLAKE2B_512
            })
            .key()
        );
        assert_ne!(
            ChfConfig::from(Argon2Config::TEST).key(),
            ChfConfig::from(Argon2Config {
                version: Version::V10,
                ..Argon2Config::TEST
            })
            .key()
        );
    }

    #[test]
    fn build_reports_own_config() {
        for config in all_test_configs() {
            assert_eq!(config, config.build().unwrap().config());
        }
    }

    #[test]
    fn build_rejects_invalid() {
        let config = ChfConfig::from(ScryptConfig {
            work_factor: 1,
            ..ScryptConfig::TEST
        });
        assert!(matches!(config.validate(), Err(ChfError::BadParameters(_))));
        assert!(matches!(config.build(), Err(ChfError::BadParameters(_))));
    }

    #[rstest]
    #[case::argon2(
        "$argon2d$v=19$m=1024,t=3,p=1$a1hYRFVFUUhMdzF5dk43$GvtgSr24rB/U/idt+1Xq2tn0DIav/H2W0BybTLZijZY",
        ChfConfig::Argon2(Argon2Config {
            memory_kib: 1024,
            iterations: 3,
            parallelism: 1,
            output_length: 32,
            variant: Variant::D,
            version: Version::V13,
        })
    )]
    #[case::compressed_pbkdf2(
        "$3$42949672960256$YWJj$/WTQfTTc8Hg8GlplP0LthpgdElUG+I3MyuvK8MI4MnQ=",
        ChfConfig::CompressedPbkdf2(CompressedPbkdf2Config::new(Pbkdf2Config {
            algorithm: HmacAlgorithm::Sha256,
            iterations: 10_000,
            derived_bits: 256,
        }))
    )]
    #[case::scrypt("$s0$e0801$c2FsdA==$AAECAw==", ChfConfig::Scrypt(ScryptConfig {
        work_factor: 16384,
        block_size: 8,
        parallelism: 1,
        derived_key_length: 4,
    }))]
    #[case::scrypt_legacy("$e0801$c2FsdA==$AAECAw==", ChfConfig::Scrypt(ScryptConfig {
        work_factor: 16384,
        block_size: 8,
        parallelism: 1,
        derived_key_length: 4,
    }))]
    #[case::scrypt_legacy_n4("$20101$c2FsdA==$LvQ5DYZ9ythPuxwGTn/phA==", ChfConfig::Scrypt(ScryptConfig {
        work_factor: 4,
        block_size: 1,
        parallelism: 1,
        derived_key_length: 16,
    }))]
    fn from_hash(#[case] hashed: &str, #[case] expected: ChfConfig) {
        assert_eq!(expected, ChfConfig::from_hash(hashed).unwrap());
    }

    #[cfg(feature = "bcrypt")]
    #[test]
    fn from_hash_bcrypt() {
        assert_eq!(
            ChfConfig::Bcrypt(BcryptConfig { cost: 10 }),
            ChfConfig::from_hash("$2y$10$abcdefghijklmnopqrstuuABCDEFGHIJKLMNOPQRSTUVWXYZ01234")
                .unwrap()
        );
    }

    #[rstest]
    #[case::empty("")]
    #[case::hex_digest("5fc5a199294099e98280dac6047523aa")]
    #[case::too_many_fields("$1$2$3$4$5$6$7")]
    #[case::compressed_with_unknown_field("$3$abc$YWJj$YWJj")]
    fn from_hash_rejects(#[case] hashed: &str) {
        assert!(matches!(
            ChfConfig::from_hash(hashed),
            Err(ChfError::BadParameters(_))
        ));
    }

    #[test]
    fn from_hash_unknown_hmac_is_unsupported() {
        assert!(matches!(
            ChfConfig::from_hash("$9$42949672960256$YWJj$YWJj"),
            Err(ChfError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn serde_tags() {
        let json = serde_json::to_value(ChfConfig::from(MessageDigestConfig {
            algorithm: DigestAlgorithm::Sha256,
            salt_option: SaltOption::Prepend,
        }))
        .unwrap();
        assert_eq!("message-digest", json["function"]);
        assert_eq!("SHA-256", json["algorithm"]);
        for config in all_test_configs() {
            let json = serde_json::to_string(&config).unwrap();
            assert_eq!(config, serde_json::from_str::<ChfConfig>(&json).unwrap());
        }
    }
}
