//! Scrypt key derivation function (RFC 7914).
//!
//! Scrypt is a memory-hard password-based key derivation function designed to be
//! expensive to perform hardware attacks (ASICs and GPUs).
//!
//! # Parameters
//!
//! - **N** (`work_factor`): CPU/memory cost, a power of 2. Higher values
//!   require more memory and time.
//! - **r** (`block_size`): Block size parameter. Affects memory and CPU usage.
//! - **p** (`parallelism`): Number of independent mixing lanes, run in parallel.
//!
//! `N·r` and `r·p` must both stay below `2^24`.
//!
//! # Preset Settings
//!
//! - [`ScryptConfig::DEFAULT`]: 64MB memory
//! - [`ScryptConfig::INTERACTIVE`]: 16MB memory, for logins that have to respond quickly
//! - [`ScryptConfig::TEST`]: Fast settings for testing only
//!
//! # Example
//!
//! ```
//! use passhash::kdf::scrypt::derive_key;
//!
//! let key = derive_key(b"my_secure_password", b"salt", 1024, 8, 1, 32).unwrap();
//! assert_eq!(32, key.len());
//! ```

mod config;
pub use config::{MAX_PACKED_PARAMETER, ScryptConfig};

mod engine;
pub use engine::{
    MAX_COST, Scratch, blockmix_salsa8, derive_key, integerify, required_memory, salsa20_8, smix,
    validate_parameters,
};

mod format;
pub use format::ScryptHashString;

mod function;
pub use function::ScryptFunction;
