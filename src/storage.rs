//! Persistent key-value storage for the active locale
//!
//! Plays the role of the browser's local storage: string keys, string values,
//! durable across page loads when file-backed.

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

/// Errors raised when writing to a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error when failing to write the backing file
    #[error("Failed to write storage file: {0}")]
    Io(#[from] std::io::Error),
    /// Error when failing to serialize the stored entries
    #[error("Failed to serialize storage: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string key-value store.
///
/// Reads never fail; an unreadable entry behaves like an absent one.
pub trait Storage {
    /// Returns the value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the backend cannot persist the value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage that lives as long as the value itself.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    /// Stored entries
    items: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage persisted as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Backing file path
    path: PathBuf,
    /// Entries as last read or written
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Opens the store at `path`.
    ///
    /// A missing file is an empty store. Unreadable or malformed content is
    /// logged and also treated as empty; the file is left untouched until the
    /// next write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = read_items(&path);
        Self { path, items }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads the stored entries, returning an empty map on any failure.
fn read_items(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        tracing::debug!("Storage file not found: {:?}", path);
        return BTreeMap::new();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read storage file {:?}: {}", path, e);
            return BTreeMap::new();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed storage file {:?}: {}", path, e);
        BTreeMap::new()
    })
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.clone();
        items.insert(key.to_string(), value.to_string());

        let content = serde_json::to_string_pretty(&items)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)?;

        tracing::debug!(key, value, path = ?self.path, "Stored item");
        self.items = items;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    fn test_memory_storage_set_and_get() {
        let mut storage = MemoryStorage::new();

        assert_that!(storage.get_item("language"), none());

        storage.set_item("language", "en").unwrap();
        assert_that!(storage.get_item("language"), some(eq("en")));

        storage.set_item("language", "fr").unwrap();
        assert_that!(storage.get_item("language"), some(eq("fr")));
    }

    #[rstest]
    fn test_file_storage_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();

        let storage = FileStorage::open(temp_dir.path().join("storage.json"));

        assert_that!(storage.get_item("language"), none());
        assert!(!storage.path().exists());
    }

    #[rstest]
    fn test_file_storage_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("storage.json");

        let mut storage = FileStorage::open(&path);
        storage.set_item("language", "en").unwrap();
        storage.set_item("theme", "dark").unwrap();

        let reopened = FileStorage::open(&path);
        assert_that!(reopened.get_item("language"), some(eq("en")));
        assert_that!(reopened.get_item("theme"), some(eq("dark")));
    }

    #[rstest]
    fn test_file_storage_malformed_content_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let mut storage = FileStorage::open(&path);
        assert_that!(storage.get_item("language"), none());

        storage.set_item("language", "fr").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_that!(content, contains_substring("\"language\": \"fr\""));
    }

    #[rstest]
    fn test_file_storage_write_failure_keeps_previous_state() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes the write fail.
        let path = temp_dir.path().join("storage.json");
        fs::create_dir(&path).unwrap();

        let mut storage = FileStorage::open(&path);
        let result = storage.set_item("language", "en");

        assert_that!(result, err(anything()));
        assert_that!(storage.get_item("language"), none());
    }
}
