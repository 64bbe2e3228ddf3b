use goto_core::error::Result;
use goto_core::{Key, RedirectStore};
use std::collections::HashMap;

/// In-memory implementation of the redirect store.
///
/// A plain `HashMap` is enough here: like every store engine, this one is
/// owned by exactly one caller and is never accessed concurrently.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRedirectStore {
    records: HashMap<Key, String>,
}

impl InMemoryRedirectStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RedirectStore for InMemoryRedirectStore {
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn lookup(&self, key: &Key) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn save(&mut self, key: &Key, url: &str) -> Result<()> {
        self.records.insert(key.clone(), url.to_owned());
        Ok(())
    }
}
