//! Storage tiers behind the state store
//!
//! A tier knows how to read, write and remove raw state bytes for one
//! storage layout. The store walks migrating tiers before the authoritative
//! one, so old layouts drain into the current one as states are touched.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{StateError, StorageError};
use crate::state::key::StateKey;
use crate::storage::{BlobStorage, KvStore};

/// One storage layout holding state entries.
#[async_trait]
pub trait StateTier: Send + Sync {
    /// Short tier name for log lines.
    fn name(&self) -> &str;

    /// Read the bytes stored for `key`, or `None` when the tier holds no
    /// entry for it.
    async fn read(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError>;

    /// Store `value` for `key`, replacing any previous entry.
    async fn write(&self, key: &StateKey, value: Vec<u8>) -> Result<(), StateError>;

    /// Remove the entry for `key`, returning whether one existed.
    async fn remove(&self, key: &StateKey) -> Result<bool, StateError>;
}

/// The frozen hierarchical layout in blob storage.
///
/// This tier only drains: reads and removals work, but writes are rejected
/// so no new state can land in the old layout.
pub struct LegacyBlobTier {
    storage: Arc<dyn BlobStorage>,
}

impl LegacyBlobTier {
    pub fn new(storage: Arc<dyn BlobStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl StateTier for LegacyBlobTier {
    fn name(&self) -> &str {
        "legacy-blob"
    }

    async fn read(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError> {
        match self.storage.get_file(&key.legacy_uri()).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, _key: &StateKey, _value: Vec<u8>) -> Result<(), StateError> {
        Err(StorageError::Backend("legacy state layout is read-only".to_string()).into())
    }

    async fn remove(&self, key: &StateKey) -> Result<bool, StateError> {
        Ok(self.storage.delete_file(&key.legacy_uri()).await?)
    }
}

/// The current layout in the namespace-scoped key-value store.
pub struct KvTier {
    kv: Arc<dyn KvStore>,
}

impl KvTier {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl StateTier for KvTier {
    fn name(&self) -> &str {
        "kv"
    }

    async fn read(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StateError> {
        let entry = self.kv.get(&key.flat()).await?;
        Ok(entry.map(|entry| entry.value))
    }

    async fn write(&self, key: &StateKey, value: Vec<u8>) -> Result<(), StateError> {
        Ok(self.kv.put(&key.flat(), value, None).await?)
    }

    async fn remove(&self, key: &StateKey) -> Result<bool, StateError> {
        Ok(self.kv.delete(&key.flat()).await?)
    }
}
