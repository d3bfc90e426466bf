use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ChfError, Result};

/// Number of slices a lane is split into. Lanes synchronize at slice boundaries.
pub const SYNC_POINTS: u32 = 4;

pub const MIN_OUTPUT_LENGTH: usize = 4;

pub const MAX_PARALLELISM: u32 = (1 << 24) - 1;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Data-dependent addressing
    #[display("d")]
    D,
    /// Data-independent addressing
    #[display("i")]
    I,
    /// Data-independent addressing for the first half of the first pass, data-dependent afterwards
    #[display("id")]
    Id,
}

impl Variant {
    pub const ALL: [Self; 3] = [Self::D, Self::I, Self::Id];

    /// The type code `y` hashed into `H0` and the address blocks.
    pub fn code(self) -> u32 {
        match self {
            Self::D => 0,
            Self::I => 1,
            Self::Id => 2,
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.to_string() == name)
            .ok_or_else(|| ChfError::unsupported(format!("Unknown Argon2 variant `{name}`")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Version {
    /// 0x10. Later passes overwrite blocks.
    V10,
    /// 0x13. Later passes XOR into blocks.
    V13,
}

impl Version {
    pub fn number(self) -> u32 {
        match self {
            Self::V10 => 0x10,
            Self::V13 => 0x13,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u32> for Version {
    type Error = ChfError;

    fn try_from(number: u32) -> Result<Self> {
        match number {
            0x10 => Ok(Self::V10),
            0x13 => Ok(Self::V13),
            _ => Err(ChfError::unsupported(format!(
                "Unsupported Argon2 version {number}"
            ))),
        }
    }
}

impl From<Version> for u32 {
    fn from(version: Version) -> u32 {
        version.number()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argon2Config {
    /// `m`
    pub memory_kib: u32,
    /// `t`, the number of passes over memory
    pub iterations: u32,
    /// `p`, the number of lanes
    pub parallelism: u32,
    pub output_length: usize,
    pub variant: Variant,
    pub version: Version,
}

impl Argon2Config {
    pub const DEFAULT: Self = Self {
        memory_kib: 15_360,
        iterations: 2,
        parallelism: 1,
        output_length: 32,
        variant: Variant::Id,
        version: Version::V13,
    };

    /// Cheap settings for tests only
    pub const TEST: Self = Self {
        memory_kib: 64,
        iterations: 2,
        // More than one lane so lane crossing is covered
        parallelism: 2,
        output_length: 32,
        variant: Variant::Id,
        version: Version::V13,
    };

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(ChfError::bad_parameters("Argon2 iterations must be positive"));
        }
        if self.memory_kib == 0 {
            return Err(ChfError::bad_parameters("Argon2 memory cost must be positive"));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(ChfError::bad_parameters(format!(
                "Argon2 parallelism must be between 1 and {MAX_PARALLELISM} but is {}",
                self.parallelism
            )));
        }
        if self.output_length < MIN_OUTPUT_LENGTH || u32::try_from(self.output_length).is_err() {
            return Err(ChfError::bad_parameters(format!(
                "Argon2 output length must be between {MIN_OUTPUT_LENGTH} and {} but is {}",
                u32::MAX,
                self.output_length
            )));
        }
        Ok(())
    }

    /// Smallest memory cost the given parallelism allows: two blocks per slice and lane.
    pub fn min_memory_kib(&self) -> u32 {
        2 * SYNC_POINTS * self.parallelism
    }

    /// Returns a copy whose memory cost is raised to [`min_memory_kib`](Self::min_memory_kib) if needed.
    pub fn with_minimum_memory(self) -> Self {
        let min = self.min_memory_kib();
        if self.memory_kib >= min {
            return self;
        }
        log::warn!(
            "Argon2 memory cost of {} KiB is too small for {} lanes, using {min} KiB instead",
            self.memory_kib,
            self.parallelism
        );
        Self {
            memory_kib: min,
            ..self
        }
    }

    /// Number of 1 KiB blocks actually used: the memory cost rounded down to a multiple of `4·p`.
    pub fn memory_blocks(&self) -> u32 {
        let memory = self.memory_kib.max(self.min_memory_kib());
        let per_segment = SYNC_POINTS * self.parallelism;
        memory / per_segment * per_segment
    }

    pub fn required_memory(&self) -> u64 {
        u64::from(self.memory_blocks()) * 1024
    }
}

impl fmt::Display for Argon2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "argon2{}[v={},m={},t={},p={},l={}]",
            self.variant,
            self.version,
            self.memory_kib,
            self.iterations,
            self.parallelism,
            self.output_length
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn presets_are_valid(#[values(Argon2Config::DEFAULT, Argon2Config::TEST)] config: Argon2Config) {
        config.validate().unwrap();
        assert_eq!(config, config.with_minimum_memory());
        ::argon2::Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            Some(config.output_length),
        )
        .expect("Invalid argon2 parameters");
    }

    #[rstest]
    #[case::no_iterations(Argon2Config { iterations: 0, ..Argon2Config::TEST })]
    #[case::no_memory(Argon2Config { memory_kib: 0, ..Argon2Config::TEST })]
    #[case::no_lanes(Argon2Config { parallelism: 0, ..Argon2Config::TEST })]
    #[case::too_many_lanes(Argon2Config { parallelism: 1 << 24, ..Argon2Config::TEST })]
    #[case::output_too_short(Argon2Config { output_length: 3, ..Argon2Config::TEST })]
    fn rejects_invalid(#[case] config: Argon2Config) {
        assert!(matches!(config.validate(), Err(ChfError::BadParameters(_))));
    }

    #[test]
    fn memory_is_raised_to_minimum() {
        let config = Argon2Config {
            memory_kib: 10,
            parallelism: 4,
            ..Argon2Config::TEST
        };
        assert_eq!(32, config.with_minimum_memory().memory_kib);
        assert_eq!(32, config.memory_blocks());
    }

    #[test]
    fn memory_blocks_round_down_to_whole_segments() {
        let config = Argon2Config {
            memory_kib: 1000,
            parallelism: 3,
            ..Argon2Config::TEST
        };
        assert_eq!(996, config.memory_blocks());
        assert_eq!(996 * 1024, config.required_memory());
    }

    #[test]
    fn versions() {
        assert_eq!(Version::V10, Version::try_from(16).unwrap());
        assert_eq!(Version::V13, Version::try_from(19).unwrap());
        assert!(matches!(
            Version::try_from(18),
            Err(ChfError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn variant_names() {
        for variant in Variant::ALL {
            assert_eq!(variant, Variant::from_name(&variant.to_string()).unwrap());
        }
        assert!(Variant::from_name("x").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(
            "argon2id[v=19,m=15360,t=2,p=1,l=32]",
            Argon2Config::DEFAULT.to_string()
        );
    }

    #[test]
    fn deserialize() {
        let config: Argon2Config = serde_json::from_str(
            r#"{"memory_kib": 64, "iterations": 2, "parallelism": 2, "output_length": 32, "variant": "id", "version": 19}"#,
        )
        .unwrap();
        assert_eq!(Argon2Config::TEST, config);
    }
}
