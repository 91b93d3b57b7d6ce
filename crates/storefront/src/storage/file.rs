//! File-backed storage backend.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};
use crate::config::StorefrontConfig;

/// Stores all keys in one JSON object file.
///
/// Writes go to a sibling temp file which is then renamed over the original,
/// so a reader never observes a half-written file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured `storage_path`.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(config.storage_path.clone())
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let body = serde_json::to_vec_pretty(entries)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&body)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), bytes = body.len(), "Storage file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Corrupt(e)) => {
                warn!(path = %self.path.display(), error = %e, "Replacing corrupt storage file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}
