use std::fmt::{self, Debug};

use super::{Argon2Config, Variant, Version};
use crate::codec;
use crate::error::{ChfError, Result};
use crate::kdf::HashString;

const FAMILY: &str = "Argon2";

/// A parsed Argon2 hash string in PHC format:
/// `$argon2<variant>$v=<version>$m=<memory>,t=<iterations>,p=<parallelism>$<salt>$<digest>`,
/// with salt and digest in unpadded base64.
///
/// Strings without the `v=` field were produced by version 16 and decode as such.
/// The output length is the length of the digest.
#[derive(Clone, PartialEq, Eq)]
pub struct Argon2HashString {
    pub config: Argon2Config,
    pub salt: Vec<u8>,
    pub digest: Vec<u8>,
}

fn parse_field<'a>(field: &'a str, key: &str, hashed: &str) -> Result<&'a str> {
    field
        .strip_prefix(key)
        .and_then(|rest| rest.strip_prefix('='))
        .ok_or_else(|| ChfError::invalid_hash(FAMILY, hashed))
}

fn parse_number(field: &str, key: &str, hashed: &str) -> Result<u32> {
    parse_field(field, key, hashed)?
        .parse()
        .map_err(|_| ChfError::invalid_hash(FAMILY, hashed))
}

impl HashString for Argon2HashString {
    fn encode(&self) -> String {
        format!(
            "$argon2{}$v={}$m={},t={},p={}${}${}",
            self.config.variant,
            self.config.version,
            self.config.memory_kib,
            self.config.iterations,
            self.config.parallelism,
            codec::base64_encode_unpadded(&self.salt),
            codec::base64_encode_unpadded(&self.digest),
        )
    }

    fn decode(hashed: &str) -> Result<Self> {
        let fields: Vec<&str> = hashed.split('$').collect();
        let (variant, version, params, salt, digest) = match fields.as_slice() {
            ["", variant, version, params, salt, digest] => {
                let version = parse_number(version, "v", hashed)?;
                (*variant, Version::try_from(version)?, *params, *salt, *digest)
            }
            ["", variant, params, salt, digest] => {
                (*variant, Version::V10, *params, *salt, *digest)
            }
            _ => return Err(ChfError::invalid_hash(FAMILY, hashed)),
        };
        let variant = variant
            .strip_prefix("argon2")
            .ok_or_else(|| ChfError::invalid_hash(FAMILY, hashed))?;
        let variant = Variant::from_name(variant)?;

        let [memory, iterations, parallelism] = params.split(',').collect::<Vec<_>>()[..] else {
            return Err(ChfError::invalid_hash(FAMILY, hashed));
        };
        let salt = codec::base64_decode(salt)?;
        let digest = codec::base64_decode(digest)?;
        if salt.is_empty() {
            return Err(ChfError::bad_parameters("Argon2 salt must not be empty"));
        }

        let config = Argon2Config {
            memory_kib: parse_number(memory, "m", hashed)?,
            iterations: parse_number(iterations, "t", hashed)?,
            parallelism: parse_number(parallelism, "p", hashed)?,
            output_length: digest.len(),
            variant,
            version,
        };
        config.validate()?;
        Ok(Self {
            config,
            salt,
            digest,
        })
    }
}

impl Debug for Argon2HashString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2HashString")
            .field("config", &self.config)
            .field("salt", &hex::encode(&self.salt))
            .field("digest", &hex::encode(&self.digest))
            .finish()
    }
}
