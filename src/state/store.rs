//! Tiered state store
//!
//! State entries written by older releases live in a hierarchical blob
//! layout; current entries live in the namespace-scoped key-value store.
//! Reads check the old layout first and migrate any hit into the current
//! one, so the legacy tier drains lazily without a bulk migration step.

use std::sync::Arc;

use crate::context::RunContext;
use crate::error::StateError;
use crate::state::key::StateKey;
use crate::state::tier::{KvTier, LegacyBlobTier, StateTier};

/// Durable per-flow state addressed by name, sub-name and correlation value.
pub struct StateStore {
    ctx: Arc<dyn RunContext>,
    migrating: Vec<Arc<dyn StateTier>>,
    authoritative: Arc<dyn StateTier>,
}

impl StateStore {
    /// Build the default tier chain for `ctx`: the legacy blob layout
    /// draining into the namespace's key-value store.
    pub fn new(ctx: Arc<dyn RunContext>) -> Self {
        let namespace = ctx.flow_info().namespace;
        let legacy: Arc<dyn StateTier> = Arc::new(LegacyBlobTier::new(ctx.storage()));
        let authoritative: Arc<dyn StateTier> = Arc::new(KvTier::new(ctx.kv(&namespace)));
        Self {
            ctx,
            migrating: vec![legacy],
            authoritative,
        }
    }

    /// Build a store over a custom tier chain. Migrating tiers are checked
    /// in order before the authoritative tier.
    pub fn with_tiers(
        ctx: Arc<dyn RunContext>,
        migrating: Vec<Arc<dyn StateTier>>,
        authoritative: Arc<dyn StateTier>,
    ) -> Self {
        Self {
            ctx,
            migrating,
            authoritative,
        }
    }

    /// The key a state name resolves to for the current flow.
    pub fn state_key(
        &self,
        name: &str,
        sub_name: Option<&str>,
        correlation: Option<&str>,
    ) -> StateKey {
        StateKey::derive(&self.ctx.flow_info(), name, sub_name, correlation)
    }

    /// Read the bytes stored for a state.
    ///
    /// A hit in a migrating tier is moved into the authoritative tier
    /// before it is returned. The source removal is best effort and only
    /// logs on failure (a lingering copy is re-repaired by the next read);
    /// a failed authoritative write fails the whole read, leaving the
    /// payload wherever it still is.
    pub async fn get(
        &self,
        name: &str,
        sub_name: Option<&str>,
        correlation: Option<&str>,
    ) -> Result<Vec<u8>, StateError> {
        let key = self.state_key(name, sub_name, correlation);

        for tier in &self.migrating {
            if let Some(bytes) = tier.read(&key).await? {
                if let Err(err) = tier.remove(&key).await {
                    log::warn!(
                        "Failed to remove state {} from tier {} during migration: {err}",
                        key.flat(),
                        tier.name()
                    );
                }
                self.authoritative.write(&key, bytes.clone()).await?;
                log::info!(
                    "Migrated state {} from tier {} to tier {}",
                    key.flat(),
                    tier.name(),
                    self.authoritative.name()
                );
                return Ok(bytes);
            }
        }

        match self.authoritative.read(&key).await? {
            Some(bytes) => Ok(bytes),
            None => Err(StateError::NotFound { key: key.flat() }),
        }
    }

    /// Store the bytes for a state, replacing any previous value in any
    /// tier. Returns the flat key the value now lives under.
    pub async fn put(
        &self,
        name: &str,
        sub_name: Option<&str>,
        correlation: Option<&str>,
        value: Vec<u8>,
    ) -> Result<String, StateError> {
        let key = self.state_key(name, sub_name, correlation);

        // Purge stale copies so a later read cannot resurrect them.
        for tier in &self.migrating {
            tier.remove(&key).await?;
        }

        self.authoritative.write(&key, value).await?;
        Ok(key.flat())
    }

    /// Delete a state, returning whether any tier held an entry.
    ///
    /// The first migrating tier that removes something answers the call;
    /// the authoritative tier is only consulted when none did.
    pub async fn delete(
        &self,
        name: &str,
        sub_name: Option<&str>,
        correlation: Option<&str>,
    ) -> Result<bool, StateError> {
        let key = self.state_key(name, sub_name, correlation);

        for tier in &self.migrating {
            if tier.remove(&key).await? {
                return Ok(true);
            }
        }

        self.authoritative.remove(&key).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::context::FlowInfo;
    use crate::error::{KvError, RenderError, StorageError};
    use crate::storage::{BlobStorage, KvMetadata, KvStore, MemoryBlobStorage, MemoryKvStore};

    use super::*;

    struct MockContext {
        storage: Arc<MemoryBlobStorage>,
        kv: Arc<MemoryKvStore>,
    }

    impl MockContext {
        fn new() -> Self {
            Self {
                storage: Arc::new(MemoryBlobStorage::new()),
                kv: Arc::new(MemoryKvStore::new()),
            }
        }
    }

    impl RunContext for MockContext {
        fn render(&self, expression: &str) -> Result<String, RenderError> {
            Ok(expression.to_string())
        }

        fn flow_info(&self) -> FlowInfo {
            FlowInfo::new("company.team", "demo")
        }

        fn storage(&self) -> Arc<dyn BlobStorage> {
            self.storage.clone()
        }

        fn kv(&self, _namespace: &str) -> Arc<dyn KvStore> {
            self.kv.clone()
        }
    }

    #[tokio::test]
    async fn test_get_migrates_legacy_entries_into_kv() {
        let ctx = Arc::new(MockContext::new());
        let store = StateStore::new(ctx.clone());
        let legacy_uri = store.state_key("counter", None, None).legacy_uri();
        ctx.storage.insert(&legacy_uri, b"17".to_vec()).await;

        assert_eq!(store.get("counter", None, None).await.unwrap(), b"17");

        assert!(!ctx.storage.contains(&legacy_uri).await);
        assert!(ctx.kv.contains("demo_states_counter").await);

        // Second read comes straight from the authoritative tier.
        assert_eq!(store.get("counter", None, None).await.unwrap(), b"17");
    }

    #[tokio::test]
    async fn test_get_falls_back_to_kv() {
        let ctx = Arc::new(MockContext::new());
        let store = StateStore::new(ctx);

        store
            .put("counter", None, None, b"42".to_vec())
            .await
            .unwrap();
        assert_eq!(store.get("counter", None, None).await.unwrap(), b"42");
    }

    #[tokio::test]
    async fn test_get_reports_missing_states() {
        let ctx = Arc::new(MockContext::new());
        let store = StateStore::new(ctx);

        match store.get("counter", None, None).await {
            Err(StateError::NotFound { key }) => assert_eq!(key, "demo_states_counter"),
            other => panic!("expected not-found error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_put_purges_legacy_and_returns_key() {
        let ctx = Arc::new(MockContext::new());
        let store = StateStore::new(ctx.clone());
        let legacy_uri = store.state_key("counter", None, None).legacy_uri();
        ctx.storage.insert(&legacy_uri, b"old".to_vec()).await;

        let key = store
            .put("counter", None, None, b"new".to_vec())
            .await
            .unwrap();

        assert_eq!(key, "demo_states_counter");
        assert!(!ctx.storage.contains(&legacy_uri).await);
        assert_eq!(store.get("counter", None, None).await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_delete_prefers_legacy() {
        let ctx = Arc::new(MockContext::new());
        let store = StateStore::new(ctx.clone());
        let legacy_uri = store.state_key("counter", None, None).legacy_uri();
        ctx.storage.insert(&legacy_uri, b"old".to_vec()).await;
        ctx.kv
            .put("demo_states_counter", b"new".to_vec(), None)
            .await
            .unwrap();

        // Legacy removal short-circuits, leaving the kv entry in place.
        assert!(store.delete("counter", None, None).await.unwrap());
        assert!(ctx.kv.contains("demo_states_counter").await);

        assert!(store.delete("counter", None, None).await.unwrap());
        assert!(!store.delete("counter", None, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_correlation_values_address_distinct_states() {
        let ctx = Arc::new(MockContext::new());
        let store = StateStore::new(ctx);

        store
            .put("sync", Some("window"), Some("2024-08-01"), b"a".to_vec())
            .await
            .unwrap();

        assert_eq!(
            store
                .get("sync", Some("window"), Some("2024-08-01"))
                .await
                .unwrap(),
            b"a"
        );
        assert!(store
            .get("sync", Some("window"), Some("2024-08-02"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_expired_entries_surface_through_get() {
        let ctx = Arc::new(MockContext::new());
        let store = StateStore::new(ctx.clone());
        let metadata = KvMetadata::new(None, Some(chrono::Duration::seconds(-1)));
        ctx.kv
            .put("demo_states_counter", b"old".to_vec(), Some(metadata))
            .await
            .unwrap();

        match store.get("counter", None, None).await {
            Err(StateError::Kv(KvError::Expired { key })) => {
                assert_eq!(key, "demo_states_counter")
            }
            other => panic!("expected expired error, got {other:?}"),
        }
    }

    /// A tier holding one sticky entry that cannot be removed.
    struct StuckTier {
        value: Vec<u8>,
    }

    #[async_trait]
    impl StateTier for StuckTier {
        fn name(&self) -> &str {
            "stuck"
        }

        async fn read(&self, _key: &StateKey) -> Result<Option<Vec<u8>>, StateError> {
            Ok(Some(self.value.clone()))
        }

        async fn write(&self, _key: &StateKey, _value: Vec<u8>) -> Result<(), StateError> {
            Err(StorageError::Backend("read-only".to_string()).into())
        }

        async fn remove(&self, _key: &StateKey) -> Result<bool, StateError> {
            Err(StorageError::Backend("removal refused".to_string()).into())
        }
    }

    #[tokio::test]
    async fn test_failed_cleanup_does_not_fail_read() {
        let ctx = Arc::new(MockContext::new());
        let stuck: Arc<dyn StateTier> = Arc::new(StuckTier {
            value: b"17".to_vec(),
        });
        let authoritative: Arc<dyn StateTier> = Arc::new(KvTier::new(ctx.kv.clone()));
        let store = StateStore::with_tiers(ctx.clone(), vec![stuck], authoritative);

        assert_eq!(store.get("counter", None, None).await.unwrap(), b"17");
        assert!(ctx.kv.contains("demo_states_counter").await);
    }
}
