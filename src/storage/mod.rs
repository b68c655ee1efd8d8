// SPDX-License-Identifier: MIT

//! Storage backend contracts consumed by the state store
//!
//! This module defines the seams, not the backends:
//! - `BlobStorage` - the legacy hierarchical, URI-addressed byte store
//! - `KvStore` - the namespace-scoped flat key-value store
//! - `memory` - in-memory implementations for tests and local development

pub mod blob;
pub mod kv;
pub mod memory;

pub use blob::BlobStorage;
pub use kv::{KvEntry, KvMetadata, KvStore};
pub use memory::{MemoryBlobStorage, MemoryKvStore};
