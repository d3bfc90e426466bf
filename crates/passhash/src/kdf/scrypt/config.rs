use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use super::engine;
use crate::error::{ChfError, Result};

/// Largest block size and parallelism a scrypt hash string can carry, both are packed into 8 bits.
pub const MAX_PACKED_PARAMETER: u32 = u8::MAX as u32;

/// Scrypt memory usage: `128 * r * p * (N + 2)` bytes when all `p` lanes run at once,
/// `128 * r * (N + p + 1)` when they run one after another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScryptConfig {
    /// `N`, the CPU/memory cost. A power of 2 greater than 1.
    pub work_factor: u64,
    /// `r`
    pub block_size: u32,
    /// `p`
    pub parallelism: u32,
    pub derived_key_length: usize,
}

impl ScryptConfig {
    /// Memory usage: 64MB (see formula in comment above)
    pub const DEFAULT: Self = Self {
        work_factor: 65_536,
        block_size: 8,
        parallelism: 1,
        derived_key_length: 64,
    };

    /// Memory usage: 16MB (see formula in comment above)
    pub const INTERACTIVE: Self = Self {
        work_factor: 16_384,
        block_size: 8,
        parallelism: 1,
        derived_key_length: 64,
    };

    /// Memory usage: 256kB (see formula in comment above)
    pub const TEST: Self = Self {
        work_factor: 1_024,
        block_size: 1,
        // Use p != r so we find encoding errors
        parallelism: 2,
        derived_key_length: 32,
    };

    pub fn validate(&self) -> Result<()> {
        engine::validate_parameters(self.work_factor, self.block_size, self.parallelism)?;
        if self.block_size > MAX_PACKED_PARAMETER || self.parallelism > MAX_PACKED_PARAMETER {
            return Err(ChfError::bad_parameters(format!(
                "scrypt block size and parallelism must be at most {MAX_PACKED_PARAMETER} but are r={}, p={}",
                self.block_size, self.parallelism
            )));
        }
        if self.derived_key_length == 0 {
            return Err(ChfError::bad_parameters(
                "scrypt derived key length must be positive",
            ));
        }
        Ok(())
    }

    /// `log2(N)`. Only meaningful for a validated config.
    pub fn log_n(&self) -> u32 {
        self.work_factor.ilog2()
    }

    pub fn required_memory(&self) -> u64 {
        engine::required_memory(self.work_factor, self.block_size, self.parallelism)
    }
}

impl Display for ScryptConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scrypt[N={},r={},p={},l={}]",
            self.work_factor, self.block_size, self.parallelism, self.derived_key_length
        )
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn presets_are_valid(
        #[values(ScryptConfig::DEFAULT, ScryptConfig::INTERACTIVE, ScryptConfig::TEST)]
        config: ScryptConfig,
    ) {
        config.validate().unwrap();
        ::scrypt::Params::new(
            config.log_n() as u8,
            config.block_size,
            config.parallelism,
        )
        .expect("Invalid scrypt parameters");
    }

    #[rstest]
    #[case::r_too_large(ScryptConfig { block_size: 256, ..ScryptConfig::TEST })]
    #[case::p_too_large(ScryptConfig { parallelism: 256, ..ScryptConfig::TEST })]
    #[case::n_not_power_of_two(ScryptConfig { work_factor: 1000, ..ScryptConfig::TEST })]
    #[case::empty_output(ScryptConfig { derived_key_length: 0, ..ScryptConfig::TEST })]
    fn rejects_invalid(#[case] config: ScryptConfig) {
        assert!(matches!(config.validate(), Err(ChfError::BadParameters(_))));
    }

    #[test]
    fn log_n() {
        assert_eq!(16, ScryptConfig::DEFAULT.log_n());
        assert_eq!(14, ScryptConfig::INTERACTIVE.log_n());
        assert_eq!(10, ScryptConfig::TEST.log_n());
    }

    #[test]
    fn display() {
        assert_eq!("scrypt[N=16384,r=8,p=1,l=64]", ScryptConfig::INTERACTIVE.to_string());
    }

    #[test]
    fn deserialize() {
        let config: ScryptConfig = serde_json::from_str(
            r#"{"work_factor": 1024, "block_size": 1, "parallelism": 2, "derived_key_length": 32}"#,
        )
        .unwrap();
        assert_eq!(ScryptConfig::TEST, config);
    }
}
