// SPDX-License-Identifier: MIT

//! In-memory storage backends
//!
//! Used by the test suite and for local development. Both stores keep their
//! data behind an `Arc`, so clones share the same underlying map.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use url::Url;

use crate::error::{KvError, StorageError};
use crate::storage::blob::BlobStorage;
use crate::storage::kv::{KvEntry, KvMetadata, KvStore};

/// `BlobStorage` backed by a map from URI string to bytes.
#[derive(Clone, Default)]
pub struct MemoryBlobStorage {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing the trait.
    pub async fn insert(&self, uri: &Url, bytes: Vec<u8>) {
        let mut files = self.files.write().await;
        files.insert(uri.as_str().to_string(), bytes);
    }

    pub async fn contains(&self, uri: &Url) -> bool {
        let files = self.files.read().await;
        files.contains_key(uri.as_str())
    }

    pub async fn len(&self) -> usize {
        let files = self.files.read().await;
        files.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BlobStorage for MemoryBlobStorage {
    async fn get_file(&self, uri: &Url) -> Result<Vec<u8>, StorageError> {
        let files = self.files.read().await;
        files
            .get(uri.as_str())
            .cloned()
            .ok_or_else(|| StorageError::not_found(uri.as_str()))
    }

    async fn delete_file(&self, uri: &Url) -> Result<bool, StorageError> {
        let mut files = self.files.write().await;
        Ok(files.remove(uri.as_str()).is_some())
    }
}

/// `KvStore` backed by a map from key to entry.
///
/// Expiry is enforced on read: a present entry whose `expires_at` has passed
/// surfaces as `KvError::Expired` instead of a value.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<RwLock<HashMap<String, KvEntry>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, KvError> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            None => Ok(None),
            Some(entry) => {
                let expired = entry
                    .metadata
                    .as_ref()
                    .and_then(|metadata| metadata.expires_at)
                    .is_some_and(|expires_at| expires_at <= Utc::now());
                if expired {
                    return Err(KvError::Expired {
                        key: key.to_string(),
                    });
                }
                Ok(Some(entry.clone()))
            }
        }
    }

    async fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        metadata: Option<KvMetadata>,
    ) -> Result<(), KvError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), KvEntry { value, metadata });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, KvError> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn uri(path: &str) -> Url {
        Url::parse(&format!("flowstate:/{path}")).unwrap()
    }

    #[tokio::test]
    async fn test_blob_storage_round_trip() {
        let storage = MemoryBlobStorage::new();
        let target = uri("demo/states/counter");

        storage.insert(&target, b"42".to_vec()).await;
        assert_eq!(storage.get_file(&target).await.unwrap(), b"42".to_vec());

        assert!(storage.delete_file(&target).await.unwrap());
        assert!(!storage.delete_file(&target).await.unwrap());
    }

    #[tokio::test]
    async fn test_blob_storage_missing_file_is_not_found() {
        let storage = MemoryBlobStorage::new();
        let err = storage.get_file(&uri("missing")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_kv_store_round_trip() {
        let store = MemoryKvStore::new();

        store.put("flow_states_counter", b"7".to_vec(), None).await.unwrap();
        let entry = store.get("flow_states_counter").await.unwrap().unwrap();
        assert_eq!(entry.value, b"7".to_vec());

        assert!(store.delete("flow_states_counter").await.unwrap());
        assert!(!store.delete("flow_states_counter").await.unwrap());
        assert_eq!(store.get("flow_states_counter").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_kv_store_surfaces_expired_entries() {
        let store = MemoryKvStore::new();
        let metadata = KvMetadata::new(None, Some(Duration::seconds(-1)));
        store
            .put("stale", b"old".to_vec(), Some(metadata))
            .await
            .unwrap();

        match store.get("stale").await {
            Err(KvError::Expired { key }) => assert_eq!(key, "stale"),
            other => panic!("expected expired error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_kv_store_ignores_future_expiry() {
        let store = MemoryKvStore::new();
        let metadata = KvMetadata::new(Some("fresh".to_string()), Some(Duration::hours(1)));
        store
            .put("fresh", b"new".to_vec(), Some(metadata))
            .await
            .unwrap();

        let entry = store.get("fresh").await.unwrap().unwrap();
        assert_eq!(entry.value, b"new".to_vec());
        assert_eq!(
            entry.metadata.unwrap().description.as_deref(),
            Some("fresh")
        );
    }
}
