//! Redirect store engines.
//!
//! Both engines implement [`RedirectStore`] and assume a single owner; they
//! are meant to be moved into the store worker and never shared.

pub mod memory;
pub mod sqlite;

pub use goto_core::{Key, RedirectStore, StorageError};
pub use memory::InMemoryRedirectStore;
pub use sqlite::SqliteRedirectStore;
