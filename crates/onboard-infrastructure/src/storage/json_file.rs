//! File-backed storage: one JSON object holding every item.
//!
//! Writes go through a temporary file and an atomic rename, under an
//! exclusive `fs2` lock held for the whole read-modify-write.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use onboard_core::{JourneyError, Result};

use super::KeyValueStorage;

type Items = BTreeMap<String, String>;

/// Storage persisted to a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Creates a handle for `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every item.
    ///
    /// A missing or empty file is an empty store.
    fn load(&self) -> Result<Items> {
        if !self.path.exists() {
            return Ok(Items::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Items::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    /// Writes every item atomically.
    fn save(&self, items: &Items) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(items)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Runs `f` against the current items and writes the result back.
    ///
    /// Unparsable content is discarded and replaced by the write.
    fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Items),
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut items = match self.load() {
            Err(e) if e.is_serialization() => {
                tracing::warn!(
                    path = %self.path.display(),
                    "[Storage] Discarding unreadable state file: {}",
                    e
                );
                Items::new()
            }
            other => other?,
        };
        f(&mut items);
        self.save(&items)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| JourneyError::io("storage path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| JourneyError::io("storage path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|items| {
            items.remove(key);
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.load()?.into_keys().collect())
    }

    fn remove_prefixed(&self, prefix: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|items| items.retain(|key, _| !key.starts_with(prefix)))
    }
}

/// Exclusive lock on a sibling `.lock` file, released on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| JourneyError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Best effort; the lock itself goes away with the handle
        let _ = fs::remove_file(&self.lock_path);
    }
}
