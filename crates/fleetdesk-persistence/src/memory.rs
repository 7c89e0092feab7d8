//! ---
//! fd_section: "03-persistence-logging"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Persistence abstractions and storage bindings."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{KeyValueStore, Result};

/// Process-local store. Clones share the same map, so a test can hand one
/// clone to a session and inspect the other.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let store = MemoryStore::new();
        let view = store.clone();
        store.set("user", "{}").unwrap();
        assert_eq!(view.get("user").unwrap().as_deref(), Some("{}"));
        view.remove("user").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn removing_missing_key_is_noop() {
        let store = MemoryStore::new();
        store.remove("user").unwrap();
        assert_eq!(store.get("user").unwrap(), None);
    }
}
