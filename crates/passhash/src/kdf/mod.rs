//! Memory-hard and iterated key derivation functions, each with its self-describing hash string.
//!
//! # Available KDFs
//!
//! - [`scrypt`]: memory-hard KDF built on salsa20/8 (RFC 7914)
//! - [`argon2`]: memory-hard KDF built on BLAKE2b (RFC 9106), variants d, i and id
//! - [`pbkdf2`]: iterated HMAC (RFC 8018) and its compressed hash string
//! - `bcrypt`: delegates to the `bcrypt` crate, only available with the `bcrypt` feature
//!
//! # Example
//!
//! ```
//! use passhash::hash::HashingFunction;
//! use passhash::kdf::scrypt::{ScryptConfig, ScryptFunction};
//!
//! let function = ScryptFunction::new(ScryptConfig::TEST).unwrap();
//! let hash = function.hash(b"my_password").unwrap();
//! assert!(function.check(b"my_password", hash.encoded()).unwrap());
//! ```

use crate::error::Result;

/// A typed hash string: the parsed form of a self-describing encoded hash.
///
/// `encode` and `decode` round-trip. `decode` validates every field and fails with
/// [`ChfError::BadParameters`](crate::ChfError::BadParameters) instead of producing a
/// partially valid value.
pub trait HashString: Sized {
    /// Serializes to the persistent string form.
    fn encode(&self) -> String;

    /// Parses the persistent string form.
    fn decode(hashed: &str) -> Result<Self>;
}

pub mod argon2;
#[cfg(feature = "bcrypt")]
pub mod bcrypt;
pub mod pbkdf2;
pub mod scrypt;
