use crate::key::Key;

/// A key/URL pair stored durably.
///
/// The URL is not validated here. An empty URL is legal but resolves as
/// "not found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// The lookup key.
    pub key: Key,
    /// The destination URL.
    pub url: String,
}

impl Redirect {
    pub fn new(key: Key, url: impl Into<String>) -> Self {
        Self {
            key,
            url: url.into(),
        }
    }
}
