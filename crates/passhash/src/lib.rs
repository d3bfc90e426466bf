//! Password hashing for storage and verification.
//!
//! This crate provides memory-hard and iterated key derivation functions with
//! self-describing hash strings, plain digest-style hashing functions, and a registry
//! that caches one function instance per configuration.
//!
//! # Modules
//!
//! - [`kdf`]: scrypt, Argon2, PBKDF2 (plain and compressed) and BCrypt
//! - [`hash`]: the [`HashingFunction`](hash::HashingFunction) trait, hash results, salts,
//!   BLAKE2b and SHA-1/SHA-2 message digests
//! - [`ChfConfig`]: the configuration of any hashing function, serializable with serde
//! - [`ChfRegistry`]: shared instances keyed by configuration, and recovery of the instance
//!   that produced a hash string
//!
//! # Security Considerations
//!
//! - Every `check` compares digests with [`equals`], whose running time doesn't depend on
//!   where the inputs differ
//! - Salts are generated from the operating system's secure random source
//! - Passwords and scratch memory of the KDFs are zeroed after use
//! - This crate uses `#![forbid(unsafe_code)]` to prevent memory safety issues
//!
//! # Example
//!
//! ```
//! use passhash::{ChfConfig, ChfRegistry};
//! use passhash::kdf::argon2::Argon2Config;
//!
//! let registry = ChfRegistry::new();
//! let function = registry.get_or_create(Argon2Config::TEST).unwrap();
//! let hash = function.hash(b"my password").unwrap();
//!
//! // Only the encoded string needs to be stored, it names its own configuration.
//! let stored = hash.encoded().to_string();
//! assert_eq!(ChfConfig::Argon2(Argon2Config::TEST), ChfConfig::from_hash(&stored).unwrap());
//!
//! let function = registry.instance_from_hash(&stored).unwrap();
//! assert!(function.check(b"my password", &stored).unwrap());
//! assert!(!function.check(b"not my password", &stored).unwrap());
//! ```

#![forbid(unsafe_code)]

pub mod codec;
mod config;
mod error;
pub mod hash;
pub mod kdf;
mod password;
mod registry;
mod verify;

pub use config::ChfConfig;
pub use error::{ChfError, Result};
pub use password::Password;
pub use registry::ChfRegistry;
pub use verify::equals;
