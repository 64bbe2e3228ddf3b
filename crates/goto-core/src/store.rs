use crate::error::Result;
use crate::key::Key;

/// A persistence engine for redirect records.
///
/// Implementations are not required to be thread-safe and must assume a
/// single logical caller. Mutation takes `&mut self`, so whoever owns the
/// store value holds exclusive access to it.
pub trait RedirectStore {
    /// Ensures the backing schema exists.
    ///
    /// Idempotent: calling it against an existing store must succeed and
    /// must not drop any record.
    fn initialize(&mut self) -> Result<()>;

    /// Returns the URL stored for `key`, or `None` if there is no record.
    fn lookup(&self, key: &Key) -> Result<Option<String>>;

    /// Removes any record for `key`, then inserts `(key, url)`.
    ///
    /// After a successful save exactly one record exists for `key`.
    fn save(&mut self, key: &Key, url: &str) -> Result<()>;
}
