//! Scrypt hash string storage and parsing.

use std::fmt::{self, Debug};

use super::ScryptConfig;
use crate::codec;
use crate::error::{ChfError, Result};
use crate::kdf::HashString;

const FAMILY: &str = "scrypt";
const VERSION_TAG: &str = "s0";

/// A parsed scrypt hash string.
///
/// # Format
///
/// `$s0$<params>$<base64(salt)>$<base64(digest)>`, where `params` is
/// `log2(N) << 16 | r << 8 | p` in lowercase hex. The legacy form without the `s0` field is
/// accepted when decoding. The derived key length isn't stored, it is the length of the digest.
///
/// # Example
///
/// ```
/// use passhash::kdf::HashString;
/// use passhash::kdf::scrypt::ScryptHashString;
///
/// let parsed = ScryptHashString::decode("$s0$e0801$c2FsdA==$AAECAw==").unwrap();
/// assert_eq!(16384, parsed.config.work_factor);
/// assert_eq!(8, parsed.config.block_size);
/// assert_eq!(1, parsed.config.parallelism);
/// assert_eq!(4, parsed.config.derived_key_length);
/// assert_eq!(b"salt", parsed.salt.as_slice());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ScryptHashString {
    pub config: ScryptConfig,
    pub salt: Vec<u8>,
    pub digest: Vec<u8>,
}

impl ScryptHashString {
    fn packed_parameters(&self) -> u64 {
        (u64::from(self.config.log_n()) << 16)
            | (u64::from(self.config.block_size) << 8)
            | u64::from(self.config.parallelism)
    }
}

fn parse_packed_parameters(params: &str, hashed: &str) -> Result<(u64, u32, u32)> {
    let packed =
        u64::from_str_radix(params, 16).map_err(|_| ChfError::invalid_hash(FAMILY, hashed))?;
    let log_n = packed >> 16;
    if log_n >= 64 {
        return Err(ChfError::bad_parameters(format!(
            "scrypt parameter log2(N)={log_n} must be smaller than 64"
        )));
    }
    let r = ((packed >> 8) & 0xff) as u32;
    let p = (packed & 0xff) as u32;
    Ok((1 << log_n, r, p))
}

impl HashString for ScryptHashString {
    fn encode(&self) -> String {
        format!(
            "${VERSION_TAG}${:x}${}${}",
            self.packed_parameters(),
            codec::base64_encode(&self.salt),
            codec::base64_encode(&self.digest),
        )
    }

    fn decode(hashed: &str) -> Result<Self> {
        let fields: Vec<&str> = hashed.split('$').collect();
        let (params, salt, digest) = match fields.as_slice() {
            ["", VERSION_TAG, params, salt, digest] => (*params, *salt, *digest),
            ["", params, salt, digest] => (*params, *salt, *digest),
            _ => return Err(ChfError::invalid_hash(FAMILY, hashed)),
        };
        let (work_factor, block_size, parallelism) = parse_packed_parameters(params, hashed)?;
        let salt = codec::base64_decode(salt)?;
        let digest = codec::base64_decode(digest)?;

        let config = ScryptConfig {
            work_factor,
            block_size,
            parallelism,
            derived_key_length: digest.len(),
        };
        config.validate()?;
        Ok(Self {
            config,
            salt,
            digest,
        })
    }
}

impl Debug for ScryptHashString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScryptHashString")
            .field("config", &self.config)
            .field("salt", &hex::encode(&self.salt))
            .field("digest", &hex::encode(&self.digest))
            .finish()
    }
}
