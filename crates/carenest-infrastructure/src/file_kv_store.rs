//! Device-local key/value storage backed by a single JSON map.

use crate::storage::{AtomicJsonFile, run_blocking};
use async_trait::async_trait;
use carenest_core::Result;
use carenest_core::provider_link::KeyValueStore;
use std::collections::BTreeMap;
use std::path::PathBuf;

type StorageMap = BTreeMap<String, String>;

/// `KeyValueStore` persisted as `{ "key": "value", ... }` in one file.
///
/// Values are opaque strings; callers encode their own payloads.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    file: AtomicJsonFile<StorageMap>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    /// Removes `key`. Returns whether it was present.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let file = self.file.clone();
        let key = key.to_string();
        run_blocking(move || file.update(StorageMap::new(), |map| Ok(map.remove(&key).is_some())))
            .await
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.file.clone();
        let key = key.to_string();
        run_blocking(move || {
            let map = file.load()?.unwrap_or_default();
            Ok(map.get(&key).cloned())
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let file = self.file.clone();
        let key = key.to_string();
        let value = value.to_string();
        tracing::debug!(key = %key, bytes = value.len(), "device storage write");
        run_blocking(move || {
            file.update(StorageMap::new(), |map| {
                map.insert(key, value);
                Ok(())
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_values_survive_a_new_handle() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("device_storage.json");

        let store = FileKeyValueStore::new(path.clone());
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "[1,2]").await.unwrap();
        store.set("other", "x").await.unwrap();

        let reopened = FileKeyValueStore::new(path);
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("[1,2]"));
        assert!(reopened.remove("k").await.unwrap());
        assert!(!reopened.remove("k").await.unwrap());
        assert_eq!(reopened.get("other").await.unwrap().as_deref(), Some("x"));
    }
}
