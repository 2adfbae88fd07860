//! Key-value storage back ends for persisted journey state.
//!
//! The session store addresses storage the way a browser addresses
//! `localStorage`: flat string keys mapped to string values.

mod json_file;
mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

use onboard_core::Result;

/// Flat string-to-string storage.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// All keys currently stored.
    fn keys(&self) -> Result<Vec<String>>;

    /// Removes every key starting with `prefix`.
    fn remove_prefixed(&self, prefix: &str) -> Result<()> {
        for key in self.keys()? {
            if key.starts_with(prefix) {
                self.remove_item(&key)?;
            }
        }
        Ok(())
    }
}
