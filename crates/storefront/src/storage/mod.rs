//! Durable key-value storage for client state.
//!
//! The cart is stored as a single string value under a fixed key. Two
//! backends are provided:
//!
//! - [`MemoryStore`] - in-process map, optionally with a byte quota
//! - [`FileStore`] - JSON object on disk, rewritten atomically on every `set`
//!
//! Hosts embedding the storefront can implement [`KeyValueStore`] over
//! whatever persistence they have (browser storage, a config directory, ...).

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage backend is not available.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Writing the value would exceed the backend's quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not a valid JSON object of strings.
    #[error("Corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A string key-value store that survives page reloads.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// A failed write leaves the previous value in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
