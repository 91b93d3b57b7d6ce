//! In-memory storage backend.

use std::collections::HashMap;

use super::{KeyValueStore, StorageError};

/// Map-backed store, useful for tests and hosts without durable storage.
///
/// An optional quota caps the total bytes of keys plus values, mirroring the
/// per-origin limits browsers enforce on local storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
}

impl MemoryStore {
    /// Create an empty store with no quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes beyond `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Create a store whose every operation fails, as when storage is disabled.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Seed a raw value, bypassing the quota.
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable("storage is disabled".to_string()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable("storage is disabled".to_string()));
        }
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_quota_exceeded_keeps_previous_value() {
        let mut store = MemoryStore::with_quota(8);
        store.set("k", "short").unwrap();
        let err = store.set("k", "much too long").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 8, .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn test_unavailable_fails_everything() {
        let mut store = MemoryStore::unavailable();
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable(_))));
        assert!(matches!(store.set("k", "v"), Err(StorageError::Unavailable(_))));
    }
}
