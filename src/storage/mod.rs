//! The durable key-value medium both stores persist into.
//!
//! The `Storage` trait has the shape of a browser's local storage: string keys, string
//! values, synchronous calls. Two implementations are provided, `FileStorage` for real use and
//! `MemoryStorage` for tests and for running without a home directory.

mod file;
mod memory;

use crate::Result;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// The key used by `is_available` to probe whether writes succeed.
const PROBE_KEY: &str = "__daybook_storage_probe__";

/// A synchronous, string-keyed, string-valued store.
pub trait Storage {
    /// Returns the value stored under `key`, or `None` if nothing is stored.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Checks that the storage accepts writes by setting and removing a probe key.
    fn is_available(&self) -> bool {
        self.set_item(PROBE_KEY, PROBE_KEY).is_ok() && self.remove_item(PROBE_KEY).is_ok()
    }
}
