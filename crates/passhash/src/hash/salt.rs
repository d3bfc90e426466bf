use derive_more::{Display, From};
use rand::TryRngCore as _;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::codec;
use crate::error::{ChfError, Result};

/// Salt length used when a hashing function generates its own salt.
pub const DEFAULT_SALT_LENGTH: usize = 64;

/// A salt for a hash operation.
///
/// A salt is random data that is used as an additional input to a hash function.
/// Using a unique salt for each hash operation prevents rainbow table attacks
/// and ensures that identical passwords produce different hashes.
///
/// # Security
///
/// - Salts should be generated randomly using [`Salt::generate_random()`]
/// - Each hash operation should use a unique salt
/// - Salts do not need to be kept secret (unlike peppers)
///
/// # Example
///
/// ```
/// use passhash::hash::Salt;
///
/// let salt = Salt::generate_random(16).unwrap();
/// let restored = Salt::from_hex(&salt.to_hex()).unwrap();
/// assert_eq!(salt, restored);
/// ```
#[derive(Clone, Eq, PartialEq, From)]
pub struct Salt(Vec<u8>);

impl Salt {
    /// Creates a new salt from raw bytes.
    #[inline]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw salt bytes.
    #[inline]
    pub fn get(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Encodes the salt as a lowercase hexadecimal string.
    #[inline]
    pub fn to_hex(&self) -> String {
        codec::hex_encode(&self.0)
    }

    /// Parses a salt from a hexadecimal string (case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self> {
        codec::hex_decode(hex).map(Self)
    }

    /// Generates a salt of `len` bytes from the operating system's secure random source.
    ///
    /// # Errors
    ///
    /// - [`ChfError::BadParameters`] if `len` is zero
    /// - [`ChfError::IllegalState`] if the operating system can't provide secure randomness
    pub fn generate_random(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(ChfError::bad_parameters("Salt length must be positive"));
        }
        let mut salt = vec![0; len];
        OsRng.try_fill_bytes(&mut salt).map_err(|err| {
            ChfError::illegal_state(format!("No secure random source available: {err}"))
        })?;
        Ok(Self(salt))
    }
}

impl AsRef<[u8]> for Salt {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Salt").field(&self.to_hex()).finish()
    }
}

/// Where digest-style hashing functions put the salt relative to the password.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaltOption {
    /// `salt ‖ password`
    #[display("prepend")]
    Prepend,

    /// `password ‖ salt`
    #[default]
    #[display("append")]
    Append,
}

impl SaltOption {
    /// Concatenates password and salt in the configured order.
    pub fn apply(self, password: &[u8], salt: &[u8]) -> zeroize::Zeroizing<Vec<u8>> {
        let mut salted = zeroize::Zeroizing::new(Vec::with_capacity(password.len() + salt.len()));
        match self {
            Self::Prepend => {
                salted.extend_from_slice(salt);
                salted.extend_from_slice(password);
            }
            Self::Append => {
                salted.extend_from_slice(password);
                salted.extend_from_slice(salt);
            }
        }
        salted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT_LEN: usize = 8;

    #[test]
    fn test_to_hex_and_from_hex() {
        let original = Salt::new([123u8; SALT_LEN]);

        let hex = original.to_hex();
        let restored = Salt::from_hex(&hex).unwrap();

        assert_eq!(original, restored);
    }

    #[test]
    fn test_from_hex_invalid_chars() {
        assert!(Salt::from_hex("zz").is_err());
    }

    #[test]
    fn test_generate_random() {
        let salt1 = Salt::generate_random(SALT_LEN).unwrap();
        let salt2 = Salt::generate_random(SALT_LEN).unwrap();

        assert_eq!(SALT_LEN, salt1.len());
        // Random salts should be different (with very high probability)
        assert_ne!(salt1, salt2);
    }

    #[test]
    fn test_generate_random_rejects_empty() {
        assert!(matches!(
            Salt::generate_random(0),
            Err(ChfError::BadParameters(_))
        ));
    }

    #[test]
    fn test_debug_format() {
        let salt = Salt::new([0xcd; SALT_LEN]);
        let debug_str = format!("{:?}", salt);

        assert!(debug_str.contains("Salt"));
        assert!(debug_str.contains(&salt.to_hex()));
    }

    #[test]
    fn test_hex_format() {
        let salt = Salt::new([0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
        assert_eq!("0123456789abcdef", salt.to_hex());
    }

    #[test]
    fn test_salt_option() {
        assert_eq!(b"saltpass".as_slice(), SaltOption::Prepend.apply(b"pass", b"salt").as_slice());
        assert_eq!(b"passsalt".as_slice(), SaltOption::Append.apply(b"pass", b"salt").as_slice());
        assert_eq!(SaltOption::Append, SaltOption::default());
    }
}
