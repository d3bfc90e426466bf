use std::fmt::{self, Debug};
use zeroize::Zeroizing;

use crate::codec;
use crate::error::Result;

/// A plaintext password, zeroed when dropped.
///
/// Hashing functions take `&[u8]`, get those from [`Password::as_bytes`]. Text passwords are
/// UTF-8 encoded.
///
/// # Example
///
/// ```
/// use passhash::{ChfRegistry, Password};
/// use passhash::kdf::scrypt::ScryptConfig;
///
/// let function = ChfRegistry::global().get_or_create(ScryptConfig::TEST).unwrap();
/// let password = Password::from("correct horse").with_pepper(b"kept outside the database");
/// let hash = function.hash(password.as_bytes()).unwrap();
///
/// assert!(function.check(password.as_bytes(), hash.encoded()).unwrap());
/// assert!(!function.check(b"correct horse", hash.encoded()).unwrap());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<Vec<u8>>);

impl Password {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Prepends `pepper`. The pepper is a server-side secret that is never stored with the hash.
    pub fn with_pepper(self, pepper: &[u8]) -> Self {
        let mut peppered = Zeroizing::new(Vec::with_capacity(pepper.len() + self.0.len()));
        peppered.extend_from_slice(pepper);
        peppered.extend_from_slice(&self.0);
        Self(peppered)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The password as text, for passwords that came from a string.
    ///
    /// # Errors
    ///
    /// [`ChfError::BadParameters`](crate::ChfError::BadParameters) if the bytes aren't valid UTF-8.
    pub fn to_str(&self) -> Result<&str> {
        codec::utf8_decode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Password {
    fn from(text: &str) -> Self {
        Self::new(codec::utf8_encode(text))
    }
}

impl From<String> for Password {
    fn from(text: String) -> Self {
        Self::new(text.into_bytes())
    }
}

impl From<&[u8]> for Password {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for Password {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password(****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pepper_is_prepended() {
        let password = Password::from("secret").with_pepper(b"pepper:");
        assert_eq!(b"pepper:secret", password.as_bytes());
        assert_eq!(13, password.len());
    }

    #[test]
    fn empty_pepper_changes_nothing() {
        assert_eq!(
            Password::from("secret"),
            Password::from("secret").with_pepper(b"")
        );
    }

    #[test]
    fn text_is_utf8() {
        assert_eq!("pässword".as_bytes(), Password::from("pässword").as_bytes());
        assert_eq!(
            Password::from("pässword"),
            Password::from(String::from("pässword"))
        );
        assert_eq!("pässword", Password::from("pässword").to_str().unwrap());
        assert!(Password::new(vec![0xff, 0xfe]).to_str().is_err());
    }

    #[test]
    fn debug_hides_content() {
        let password = Password::from("hunter2");
        assert_eq!("Password(****)", format!("{password:?}"));
    }
}
