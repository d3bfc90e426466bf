//! Plain message digests (SHA-1 and the SHA-2 family) as password hashing functions.
//!
//! These are fast hashes and only exist for compatibility with stored legacy hashes.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use sha2::Digest as _;
use std::fmt::{self, Debug};

use crate::codec;
use crate::config::ChfConfig;
use crate::error::Result;
use crate::hash::{Hash, HashingFunction, Salt, SaltOption};
use crate::verify;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[display("SHA-1")]
    #[serde(rename = "SHA-1")]
    Sha1,
    #[display("SHA-224")]
    #[serde(rename = "SHA-224")]
    Sha224,
    #[display("SHA-256")]
    #[serde(rename = "SHA-256")]
    Sha256,
    #[display("SHA-384")]
    #[serde(rename = "SHA-384")]
    Sha384,
    #[display("SHA-512")]
    #[serde(rename = "SHA-512")]
    Sha512,
}

impl DigestAlgorithm {
    pub fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => sha1::Sha1::digest(data).to_vec(),
            Self::Sha224 => sha2::Sha224::digest(data).to_vec(),
            Self::Sha256 => sha2::Sha256::digest(data).to_vec(),
            Self::Sha384 => sha2::Sha384::digest(data).to_vec(),
            Self::Sha512 => sha2::Sha512::digest(data).to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageDigestConfig {
    pub algorithm: DigestAlgorithm,
    #[serde(default)]
    pub salt_option: SaltOption,
}

impl MessageDigestConfig {
    pub const SHA512: Self = Self {
        algorithm: DigestAlgorithm::Sha512,
        salt_option: SaltOption::Append,
    };
}

impl fmt::Display for MessageDigestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "digest[{},salt={}]", self.algorithm, self.salt_option)
    }
}

/// A message digest as a password hashing function. The encoded hash is the lowercase hex digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDigestFunction {
    config: MessageDigestConfig,
}

impl MessageDigestFunction {
    pub fn new(config: MessageDigestConfig) -> Self {
        Self { config }
    }

    fn digest(&self, password: &[u8], salt: Option<&[u8]>) -> Vec<u8> {
        match salt {
            Some(salt) => {
                let salted = self.config.salt_option.apply(password, salt);
                self.config.algorithm.digest(&salted)
            }
            None => self.config.algorithm.digest(password),
        }
    }

    fn make_hash(&self, password: &[u8], salt: Option<&[u8]>) -> Hash {
        let digest = self.digest(password, salt);
        let encoded = codec::hex_encode(&digest);
        Hash::new(digest, encoded, salt.map(Salt::new), self.config())
    }

    fn verify(&self, password: &[u8], hashed: &str, salt: Option<&[u8]>) -> Result<bool> {
        let expected = codec::hex_decode(hashed)?;
        Ok(verify::equals(&self.digest(password, salt), &expected))
    }
}

impl HashingFunction for MessageDigestFunction {
    fn hash(&self, password: &[u8]) -> Result<Hash> {
        Ok(self.make_hash(password, None))
    }

    fn hash_with_salt(&self, password: &[u8], salt: &[u8]) -> Result<Hash> {
        Ok(self.make_hash(password, Some(salt)))
    }

    fn check(&self, password: &[u8], hashed: &str) -> Result<bool> {
        self.verify(password, hashed, None)
    }

    fn check_with_salt(&self, password: &[u8], hashed: &str, salt: &[u8]) -> Result<bool> {
        self.verify(password, hashed, Some(salt))
    }

    fn config(&self) -> ChfConfig {
        ChfConfig::MessageDigest(self.config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(DigestAlgorithm::Sha1, "a9993e364706816aba3e25717850c26c9cd0d89d")]
    #[case(
        DigestAlgorithm::Sha224,
        "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
    )]
    #[case(
        DigestAlgorithm::Sha256,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    )]
    #[case(
        DigestAlgorithm::Sha384,
        "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
    )]
    #[case(
        DigestAlgorithm::Sha512,
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
    )]
    fn known_vectors(#[case] algorithm: DigestAlgorithm, #[case] expected: &str) {
        let function = MessageDigestFunction::new(MessageDigestConfig {
            algorithm,
            salt_option: SaltOption::Append,
        });
        let hash = function.hash(b"abc").unwrap();
        assert_eq!(expected, hash.encoded());
        assert_eq!(algorithm.digest_len(), hash.digest().len());
        assert!(function.check(b"abc", expected).unwrap());
        assert!(!function.check(b"abd", expected).unwrap());
    }

    #[test]
    fn salted() {
        let function = MessageDigestFunction::new(MessageDigestConfig {
            algorithm: DigestAlgorithm::Sha256,
            salt_option: SaltOption::Prepend,
        });
        // SHA-256("abc") with "a" prepended to "bc"
        let hash = function.hash_with_salt(b"bc", b"a").unwrap();
        assert_eq!(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            hash.encoded()
        );
        assert!(function.check_with_salt(b"bc", hash.encoded(), b"a").unwrap());
        assert!(!function.check_with_salt(b"bc", hash.encoded(), b"b").unwrap());
    }
}
