use crate::error::CoreError;
use std::fmt::Display;

/// A lookup key for a redirect.
///
/// Keys must be 1-32 bytes long (the width of the persisted `key` column)
/// and must not contain `/`, whitespace, or control characters, since they
/// travel as a single URL path segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

pub const MAX_KEY_LENGTH: usize = 32;

impl Key {
    /// Creates a new `Key` after validating the input.
    pub fn new(key: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    /// Creates a `Key` without validation.
    ///
    /// Use this only for keys read back from storage or built by tests.
    pub fn new_unchecked(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(key: &str) -> std::result::Result<(), CoreError> {
        if key.is_empty() {
            return Err(CoreError::InvalidKey("key cannot be empty".to_string()));
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(CoreError::InvalidKey(format!(
                "length must be at most {}, got {}",
                MAX_KEY_LENGTH,
                key.len()
            )));
        }

        if key
            .chars()
            .any(|c| c == '/' || c.is_whitespace() || c.is_control())
        {
            return Err(CoreError::InvalidKey(format!(
                "must not contain '/', whitespace or control characters: '{}'",
                key.escape_debug()
            )));
        }

        Ok(())
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
