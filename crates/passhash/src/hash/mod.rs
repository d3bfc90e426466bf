//! Hash results, salts and the digest-style hashing functions.
//!
//! - [`Hash`]: the result of a hashing operation
//! - [`HashingFunction`]: the interface every hashing function implements
//! - [`blake2b`]: BLAKE2b primitive and hashing function
//! - [`digest`]: SHA-1 / SHA-2 message digest hashing function

pub mod blake2b;
pub mod digest;

mod function;
mod hash;
mod salt;

pub use function::HashingFunction;
pub use hash::Hash;
pub use salt::{DEFAULT_SALT_LENGTH, Salt, SaltOption};
