//! URI-addressed blob storage contract
//!
//! The legacy state layout lives in a hierarchical blob store where every
//! object is addressed by a `flowstate:/...` URI. The tiered state store only
//! ever reads and deletes through this contract; new writes always land in
//! the key-value tier.

use async_trait::async_trait;
use url::Url;

use crate::error::StorageError;

/// A hierarchical, URI-addressed byte store.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Fetch the full contents of the object at `uri`.
    ///
    /// Returns `StorageError::NotFound` when no object exists there.
    async fn get_file(&self, uri: &Url) -> Result<Vec<u8>, StorageError>;

    /// Delete the object at `uri`, returning whether anything was removed.
    ///
    /// A missing object is not an error: implementations return `Ok(false)`.
    async fn delete_file(&self, uri: &Url) -> Result<bool, StorageError>;
}
