//! Implements the `Storage` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this crate so that a presentation
//! layer can run the whole organizer without touching the filesystem.

use crate::storage::Storage;
use crate::Result;
use anyhow::bail;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// An implementation of `Storage` that holds everything in a map. Clones share the same map, so
/// an `EventStore` and a `TransactionStore` built over clones see one medium.
///
/// An optional quota, measured in bytes of keys plus values, makes writes fail the way a full
/// browser store does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl Inner {
    fn used_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that rejects any write that would take it over `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::default();
        storage.set_quota(Some(bytes));
        storage
    }

    /// Changes the quota. `Some(0)` makes every write fail, like disabled storage.
    pub fn set_quota(&self, bytes: Option<usize>) {
        self.inner.borrow_mut().quota = bytes;
    }

    /// The number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.borrow().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if let Some(quota) = inner.quota {
            let needed = inner.used_without(key) + key.len() + value.len();
            if needed > quota {
                bail!("Storage quota exceeded: writing '{key}' needs {needed} of {quota} bytes");
            }
        }
        inner.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let _ = self.inner.borrow_mut().items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_items() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").unwrap().as_deref(), Some("v"));
        b.remove_item("k").unwrap();
        assert!(a.get_item("k").unwrap().is_none());
    }

    #[test]
    fn test_quota() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345").unwrap();
        // Replacing a value only counts the new value.
        storage.set_item("k", "123456789").unwrap();
        assert!(storage.set_item("other", "x").is_err());
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("123456789"));
    }

    #[test]
    fn test_is_available() {
        let storage = MemoryStorage::new();
        assert!(storage.is_available());
        assert!(storage.is_empty());
        storage.set_quota(Some(0));
        assert!(!storage.is_available());
    }
}
