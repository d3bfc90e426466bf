//! PBKDF2 key derivation and the compressed PBKDF2 hash string.
//!
//! Two hashing functions are built on the same derivation:
//!
//! - [`Pbkdf2Function`] stores only `base64(digest)`. The caller keeps the salt.
//! - [`CompressedPbkdf2Function`] stores `$<code>$<(iterations << 32) | bits>$<salt>$<digest>`,
//!   so a stored hash is enough to reconstruct the exact function that produced it.

mod algorithm;
pub use algorithm::HmacAlgorithm;

mod config;
pub use config::{CompressedPbkdf2Config, DEFAULT_DELIMITER, Pbkdf2Config};

mod engine;
pub use engine::{derive_into, derive_key};

mod format;
pub use format::CompressedHashString;

mod function;
pub use function::{CompressedPbkdf2Function, Pbkdf2Function};
