//! Implements the `Storage` trait with one JSON file per key in a directory.

use crate::storage::Storage;
use crate::{utils, Result};
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Stores each key as `<dir>/<key>.json`. Writes replace the file atomically.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens the storage directory at `dir`, creating it if it does not exist.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        utils::make_dir(&dir).context("Unable to create the storage directory")?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            bail!("A storage key cannot be empty")
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("Invalid storage key '{key}': only letters, digits, '_' and '-' are allowed")
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        trace!("get_item {}", path.display());
        utils::read_optional(&path)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        trace!("set_item {} ({} bytes)", path.display(), value.len());
        utils::write_replace(&path, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        utils::remove_file(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path().join("storage")).unwrap();
        assert!(storage.get_item("calendarEvents").unwrap().is_none());

        storage.set_item("calendarEvents", "{}").unwrap();
        assert_eq!(
            storage.get_item("calendarEvents").unwrap().as_deref(),
            Some("{}")
        );
        assert!(storage.dir().join("calendarEvents.json").is_file());

        storage.remove_item("calendarEvents").unwrap();
        assert!(storage.get_item("calendarEvents").unwrap().is_none());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.set_item("../escape", "x").is_err());
        assert!(storage.set_item("", "x").is_err());
        assert!(storage.get_item("a/b").is_err());
    }

    #[test]
    fn test_is_available() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.is_available());
        // The probe leaves nothing behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
