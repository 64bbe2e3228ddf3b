use crate::error::RedirectError;
use crate::key::Key;
use crate::redirect::Redirect;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, RedirectError>;

/// Concurrent access point for resolving and registering redirects.
///
/// Any number of tasks may call into a `Redirector` at once; implementations
/// are responsible for serializing access to the underlying store.
#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a key to its destination URL.
    /// Returns `None` if the key is unknown or maps to an empty URL.
    async fn resolve(&self, key: &Key) -> Result<Option<String>>;

    /// Stores a redirect, replacing any previous mapping for the same key.
    async fn register(&self, redirect: Redirect) -> Result<()>;
}
