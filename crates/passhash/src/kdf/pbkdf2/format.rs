use super::config::validate_delimiter;
use super::{DEFAULT_DELIMITER, HmacAlgorithm, Pbkdf2Config};
use crate::codec;
use crate::error::{ChfError, Result};
use crate::kdf::HashString;

const FAMILY: &str = "compressed PBKDF2";

/// `$<code>$<(iterations << 32) | bits>$<base64(salt)>$<base64(digest)>`
///
/// # Example
///
/// ```
/// use passhash::kdf::HashString;
/// use passhash::kdf::pbkdf2::{CompressedHashString, HmacAlgorithm};
///
/// let parsed = CompressedHashString::decode(
///     "$3$42949672960256$YWJj$/WTQfTTc8Hg8GlplP0LthpgdElUG+I3MyuvK8MI4MnQ=",
/// )
/// .unwrap();
/// assert_eq!(HmacAlgorithm::Sha256, parsed.config.algorithm);
/// assert_eq!(10_000, parsed.config.iterations);
/// assert_eq!(256, parsed.config.derived_bits);
/// assert_eq!(b"abc", parsed.salt.as_slice());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedHashString {
    pub config: Pbkdf2Config,
    pub salt: Vec<u8>,
    pub digest: Vec<u8>,
    pub delimiter: char,
}

impl CompressedHashString {
    pub fn decode_with_delimiter(hashed: &str, delimiter: char) -> Result<Self> {
        validate_delimiter(delimiter)?;
        let fields: Vec<&str> = hashed.split(delimiter).collect();
        let ["", code, packed, salt, digest] = fields.as_slice() else {
            return Err(ChfError::invalid_hash(FAMILY, hashed));
        };
        let code: u32 = code
            .parse()
            .map_err(|_| ChfError::invalid_hash(FAMILY, hashed))?;
        let packed: u64 = packed
            .parse()
            .map_err(|_| ChfError::invalid_hash(FAMILY, hashed))?;
        let config = Pbkdf2Config::from_packed_parameters(HmacAlgorithm::from_code(code)?, packed);
        config.validate()?;

        let salt = codec::base64_decode(salt)?;
        let digest = codec::base64_decode(digest)?;
        if salt.is_empty() {
            return Err(ChfError::bad_parameters("PBKDF2 salt must not be empty"));
        }
        if digest.len() != config.derived_bits as usize / 8 {
            return Err(ChfError::bad_parameters(format!(
                "Digest of {} bytes doesn't match the declared {} bits",
                digest.len(),
                config.derived_bits
            )));
        }
        Ok(Self {
            config,
            salt,
            digest,
            delimiter,
        })
    }
}

impl HashString for CompressedHashString {
    fn encode(&self) -> String {
        let d = self.delimiter;
        format!(
            "{d}{}{d}{}{d}{}{d}{}",
            self.config.algorithm.code(),
            self.config.packed_parameters(),
            codec::base64_encode(&self.salt),
            codec::base64_encode(&self.digest),
        )
    }

    fn decode(hashed: &str) -> Result<Self> {
        Self::decode_with_delimiter(hashed, DEFAULT_DELIMITER)
    }
}
