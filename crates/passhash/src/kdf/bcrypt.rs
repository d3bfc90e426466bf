//! BCrypt, delegated to the `bcrypt` crate. Only compiled with the `bcrypt` feature.
//!
//! Hashes are emitted with the `$2b$` prefix. `$2a$`, `$2x$` and `$2y$` hashes verify as well.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::config::ChfConfig;
use crate::error::{ChfError, Result};
use crate::hash::{Hash, HashingFunction, Salt};

pub const SALT_LENGTH: usize = 16;
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// The bcrypt hash string layout: `$<version>$<cost>$<22 chars salt><31 chars checksum>`.
const CHECKSUM_LENGTH: usize = 31;
const VERSIONS: [&str; 4] = ["2a", "2b", "2x", "2y"];

/// Whether `hashed` carries a bcrypt version prefix like `$2b$`.
pub(crate) fn has_bcrypt_prefix(hashed: &str) -> bool {
    let mut fields = hashed.split('$');
    fields.next() == Some("") && fields.next().is_some_and(|version| VERSIONS.contains(&version))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BcryptConfig {
    /// Base 2 logarithm of the number of key expansion rounds.
    pub cost: u32,
}

impl BcryptConfig {
    pub const DEFAULT: Self = Self {
        cost: bcrypt::DEFAULT_COST,
    };

    /// Cheap settings for tests only
    pub const TEST: Self = Self { cost: MIN_COST };

    pub fn validate(&self) -> Result<()> {
        if !(MIN_COST..=MAX_COST).contains(&self.cost) {
            return Err(ChfError::bad_parameters(format!(
                "bcrypt cost must be between {MIN_COST} and {MAX_COST} but is {}",
                self.cost
            )));
        }
        Ok(())
    }
}

impl Display for BcryptConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bcrypt[c={}]", self.cost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BcryptFunction {
    config: BcryptConfig,
}

impl BcryptFunction {
    pub fn new(config: BcryptConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Decodes the cost a bcrypt hash string was produced with.
    pub fn config_from_hash(hashed: &str) -> Result<BcryptConfig> {
        let fields: Vec<&str> = hashed.split('$').collect();
        let ["", version, cost, rest] = fields.as_slice() else {
            return Err(ChfError::invalid_hash("bcrypt", hashed));
        };
        if !VERSIONS.contains(version) || cost.len() != 2 || rest.len() != 22 + CHECKSUM_LENGTH {
            return Err(ChfError::invalid_hash("bcrypt", hashed));
        }
        let config = BcryptConfig {
            cost: cost
                .parse()
                .map_err(|_| ChfError::invalid_hash("bcrypt", hashed))?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn map_error(err: bcrypt::BcryptError) -> ChfError {
    ChfError::bad_parameters(format!("bcrypt failed: {err}"))
}

impl HashingFunction for BcryptFunction {
    fn hash(&self, password: &[u8]) -> Result<Hash> {
        let salt = Salt::generate_random(SALT_LENGTH)?;
        self.hash_with_salt(password, salt.get())
    }

    /// `salt` must be exactly 16 bytes.
    fn hash_with_salt(&self, password: &[u8], salt: &[u8]) -> Result<Hash> {
        let salt_array: [u8; SALT_LENGTH] = salt.try_into().map_err(|_| {
            ChfError::bad_parameters(format!(
                "bcrypt salt must be {SALT_LENGTH} bytes but is {}",
                salt.len()
            ))
        })?;
        let parts =
            bcrypt::hash_with_salt(password, self.config.cost, salt_array).map_err(map_error)?;
        let encoded = parts.format_for_version(bcrypt::Version::TwoB);
        // The raw 23 byte output isn't exposed, the digest is the checksum field as stored.
        let digest = encoded.as_bytes()[encoded.len() - CHECKSUM_LENGTH..].to_vec();
        Ok(Hash::new(
            digest,
            encoded,
            Some(Salt::new(salt)),
            self.config(),
        ))
    }

    fn check(&self, password: &[u8], hashed: &str) -> Result<bool> {
        Self::config_from_hash(hashed)?;
        bcrypt::verify(password, hashed).map_err(map_error)
    }

    fn check_with_salt(&self, password: &[u8], hashed: &str, _salt: &[u8]) -> Result<bool> {
        self.check(password, hashed)
    }

    fn config(&self) -> ChfConfig {
        ChfConfig::Bcrypt(self.config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn round_trip() {
        let function = BcryptFunction::new(BcryptConfig::TEST).unwrap();
        let hash = function.hash(b"password").unwrap();
        assert!(hash.encoded().starts_with("$2b$04$"));
        assert_eq!(60, hash.encoded().len());
        assert_eq!(CHECKSUM_LENGTH, hash.digest().len());
        assert!(function.check(b"password", hash.encoded()).unwrap());
        assert!(!function.check(b"passwort", hash.encoded()).unwrap());
    }

    #[test]
    fn verifies_2y_hashes() {
        let function = BcryptFunction::new(BcryptConfig::TEST).unwrap();
        let hash = function.hash_with_salt(b"password", &[7; 16]).unwrap();
        let as_2y = hash.encoded().replacen("$2b$", "$2y$", 1);
        assert!(function.check(b"password", &as_2y).unwrap());
    }

    #[test]
    fn same_salt_same_hash() {
        let function = BcryptFunction::new(BcryptConfig::TEST).unwrap();
        let hash1 = function.hash_with_salt(b"password", &[1; 16]).unwrap();
        let hash2 = function.hash_with_salt(b"password", &[1; 16]).unwrap();
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn rejects_wrong_salt_length() {
        let function = BcryptFunction::new(BcryptConfig::TEST).unwrap();
        assert!(matches!(
            function.hash_with_salt(b"password", &[1; 15]),
            Err(ChfError::BadParameters(_))
        ));
    }

    #[rstest]
    #[case(3)]
    #[case(32)]
    fn rejects_cost_out_of_range(#[case] cost: u32) {
        assert!(matches!(
            BcryptFunction::new(BcryptConfig { cost }),
            Err(ChfError::BadParameters(_))
        ));
    }

    #[test]
    fn config_from_hash() {
        let function = BcryptFunction::new(BcryptConfig { cost: 5 }).unwrap();
        let hash = function.hash(b"password").unwrap();
        assert_eq!(
            BcryptConfig { cost: 5 },
            BcryptFunction::config_from_hash(hash.encoded()).unwrap()
        );
    }

    #[rstest]
    #[case::empty("")]
    #[case::unknown_version("$3a$04$abcdefghijklmnopqrstuuABCDEFGHIJKLMNOPQRSTUVWXYZ01234")]
    #[case::too_short("$2b$04$abcdefghijklmnopqrstuu")]
    #[case::cost_not_a_number("$2b$xx$abcdefghijklmnopqrstuuABCDEFGHIJKLMNOPQRSTUVWXYZ01234")]
    fn config_from_hash_rejects_malformed(#[case] hashed: &str) {
        assert!(matches!(
            BcryptFunction::config_from_hash(hashed),
            Err(ChfError::BadParameters(_))
        ));
    }
}
