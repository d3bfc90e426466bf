use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use super::HmacAlgorithm;
use crate::error::{ChfError, Result};

pub const DEFAULT_DELIMITER: char = '$';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pbkdf2Config {
    pub algorithm: HmacAlgorithm,
    pub iterations: u32,
    /// Length of the derived key in bits. `derived_bits / 8` bytes are produced.
    pub derived_bits: u32,
}

impl Pbkdf2Config {
    pub const DEFAULT: Self = Self {
        algorithm: HmacAlgorithm::Sha512,
        iterations: 310_000,
        derived_bits: 512,
    };

    /// Cheap settings for tests only
    pub const TEST: Self = Self {
        algorithm: HmacAlgorithm::Sha256,
        iterations: 1_000,
        derived_bits: 256,
    };

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(ChfError::bad_parameters("PBKDF2 iterations must be positive"));
        }
        if self.derived_bits < 8 {
            return Err(ChfError::bad_parameters(format!(
                "PBKDF2 key length must be at least 8 bits but is {}",
                self.derived_bits
            )));
        }
        Ok(())
    }

    /// `(iterations << 32) | bits`, as stored in the compressed hash string.
    pub fn packed_parameters(&self) -> u64 {
        (u64::from(self.iterations) << 32) | u64::from(self.derived_bits)
    }

    pub fn from_packed_parameters(algorithm: HmacAlgorithm, packed: u64) -> Self {
        Self {
            algorithm,
            iterations: (packed >> 32) as u32,
            derived_bits: (packed & 0xffff_ffff) as u32,
        }
    }
}

impl Display for Pbkdf2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pbkdf2[{},i={},l={}]",
            self.algorithm, self.iterations, self.derived_bits
        )
    }
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompressedPbkdf2Config {
    #[serde(flatten)]
    pub pbkdf2: Pbkdf2Config,
    /// Field separator of the hash string. Must not be a base64 or decimal character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl CompressedPbkdf2Config {
    pub const DEFAULT: Self = Self::new(Pbkdf2Config::DEFAULT);

    pub const fn new(pbkdf2: Pbkdf2Config) -> Self {
        Self {
            pbkdf2,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.pbkdf2.validate()?;
        validate_delimiter(self.delimiter)
    }
}

pub(super) fn validate_delimiter(delimiter: char) -> Result<()> {
    if delimiter.is_ascii_alphanumeric() || matches!(delimiter, '+' | '/' | '=') {
        return Err(ChfError::bad_parameters(format!(
            "`{delimiter}` can't be used as delimiter because it can appear in base64 or decimal fields"
        )));
    }
    Ok(())
}

impl Display for CompressedPbkdf2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "compressed-pbkdf2[{},i={},l={},d={}]",
            self.pbkdf2.algorithm,
            self.pbkdf2.iterations,
            self.pbkdf2.derived_bits,
            self.delimiter
        )
    }
}
