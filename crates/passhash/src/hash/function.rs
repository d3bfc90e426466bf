use std::fmt::Debug;

use crate::config::ChfConfig;
use crate::error::Result;
use crate::hash::Hash;

/// A configured cryptographic hash function for passwords.
///
/// Implementations are immutable after construction and cheap to share between threads.
/// Two instances built from equal configurations are interchangeable.
pub trait HashingFunction: Debug + Send + Sync {
    /// Hashes `password`, generating a fresh random salt if the function uses salts.
    fn hash(&self, password: &[u8]) -> Result<Hash>;

    /// Hashes `password` with a caller-supplied salt.
    fn hash_with_salt(&self, password: &[u8], salt: &[u8]) -> Result<Hash>;

    /// Checks `password` against a previously produced encoded hash.
    ///
    /// Returns `Ok(false)` on mismatch. Errors only if `hashed` can't be decoded, or if the
    /// function keeps its salt outside the encoded string and thus needs [`check_with_salt`](Self::check_with_salt).
    fn check(&self, password: &[u8], hashed: &str) -> Result<bool>;

    /// Checks `password` against an encoded hash that was produced with an external salt.
    ///
    /// Self-describing formats carry their own salt and ignore `salt`.
    fn check_with_salt(&self, password: &[u8], hashed: &str, salt: &[u8]) -> Result<bool>;

    /// The configuration this instance was built from.
    fn config(&self) -> ChfConfig;
}
