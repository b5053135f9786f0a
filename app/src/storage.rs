//! File-backed durable storage.
//!
//! The whole store is one JSON object (key to string value) rewritten on
//! every `set`/`remove`, so a reload sees exactly what the last transition
//! wrote.

use lexdesk_core::DurableStorage;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Errors opening or writing the storage file
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure
    #[error("Storage I/O error at {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
    /// Serialization failure
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// [`DurableStorage`] persisted to a JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open `path`, starting empty if it does not exist.
    ///
    /// A file that is not a JSON object of strings is treated as empty and
    /// replaced on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(path = %path.display(), error = %error, "Storage file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened durable storage");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn update<F>(&self, key: &str, change: F)
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        change(&mut entries);
        if let Err(error) = self.write(&entries) {
            tracing::error!(key, error = %error, "Failed to write durable storage");
        }
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.update(key, |entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.update(key, |entries| {
            entries.remove(key);
        });
    }
}
