use thiserror::Error;

/// Errors raised by the hashing functions, their configurations and the hash string codecs.
///
/// A password that doesn't match a stored hash is not an error, `check` returns `Ok(false)` for it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChfError {
    /// The caller passed a malformed hash string or an out-of-range parameter.
    #[error("Bad parameters: {0}")]
    BadParameters(String),

    /// The requested algorithm is not available.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The environment can't provide a primitive we need, e.g. a secure random source.
    #[error("Illegal state: {0}")]
    IllegalState(String),
}

impl ChfError {
    pub(crate) fn bad_parameters(message: impl Into<String>) -> Self {
        Self::BadParameters(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    pub(crate) fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    /// Error for a hash string that doesn't decode into a configuration of the given family.
    pub(crate) fn invalid_hash(family: &str, hashed: &str) -> Self {
        log::trace!("Failed to parse {family} hash string");
        Self::BadParameters(format!("`{hashed}` is not a valid {family} hash"))
    }
}

/// Shorthand for results of this crate.
pub type Result<T, E = ChfError> = std::result::Result<T, E>;
