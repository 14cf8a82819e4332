//! Key-value persistence collaborator.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// String key-value storage, as offered by NVS-style flash stores.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    /// Erasing a missing key is not an error.
    fn erase(&mut self, key: &str) -> Result<()>;
}

/// In-process [`KvStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes with [`Error::Storage`], like a flash partition that
    /// failed to open for writing.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::Storage("store is read-only".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn erase(&mut self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_erase() {
        let mut store = MemoryStore::new();
        store.set("item:1001", "{}").unwrap();
        assert_eq!(store.get("item:1001").unwrap().as_deref(), Some("{}"));
        store.erase("item:1001").unwrap();
        store.erase("item:1001").unwrap();
        assert!(store.get("item:1001").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut store = MemoryStore::new();
        store.set_read_only(true);
        assert!(matches!(store.set("k", "v"), Err(Error::Storage(_))));
        assert!(matches!(store.erase("k"), Err(Error::Storage(_))));
    }
}
