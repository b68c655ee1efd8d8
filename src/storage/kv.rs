//! Namespace-scoped key-value storage contract

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::KvError;

/// Optional metadata attached to a key-value entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KvMetadata {
    /// Free-form description of the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Point in time after which the entry is no longer readable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl KvMetadata {
    /// Build metadata with an optional time-to-live relative to now.
    pub fn new(description: Option<String>, ttl: Option<Duration>) -> Self {
        Self {
            description,
            expires_at: ttl.map(|ttl| Utc::now() + ttl),
        }
    }
}

/// A stored value together with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct KvEntry {
    pub value: Vec<u8>,
    pub metadata: Option<KvMetadata>,
}

/// A flat key-value store scoped to a single namespace.
///
/// Keys carry no hierarchy: whatever structure callers need is encoded into
/// the key string itself before it reaches this trait.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Look up the entry stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent and `KvError::Expired` when
    /// an entry exists but its expiry has passed.
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, KvError>;

    /// Store `value` under `key`, replacing any previous entry.
    async fn put(
        &self,
        key: &str,
        value: Vec<u8>,
        metadata: Option<KvMetadata>,
    ) -> Result<(), KvError>;

    /// Remove the entry under `key`, returning whether one existed.
    async fn delete(&self, key: &str) -> Result<bool, KvError>;
}
