//! Argon2 memory-hard key derivation function (RFC 9106), variants d, i and id in versions 16 and 19.
//!
//! # Example
//!
//! ```
//! use passhash::kdf::argon2::{Argon2Config, Argon2Input, Variant, Version, derive_key};
//!
//! let config = Argon2Config {
//!     memory_kib: 1024,
//!     iterations: 3,
//!     parallelism: 1,
//!     output_length: 32,
//!     variant: Variant::D,
//!     version: Version::V13,
//! };
//! let tag = derive_key(
//!     &Argon2Input::new(b"f6c4db4a54e2a370627aff3db617", b"kXXDUEQHLw1yvN7"),
//!     &config,
//! )
//! .unwrap();
//! assert_eq!(32, tag.len());
//! ```

mod block;
pub use block::{BLOCK_BYTES, Block};

mod config;
pub use config::{Argon2Config, MIN_OUTPUT_LENGTH, SYNC_POINTS, Variant, Version};

mod engine;
pub use engine::{Argon2Input, PREHASH_DIGEST_LENGTH, derive_key, initial_hash};

mod format;
pub use format::Argon2HashString;

mod function;
pub use function::Argon2Function;
