// SPDX-License-Identifier: MIT

//! Deferred parameters and tiered state for flow executions
//!
//! Two mechanisms make up this crate:
//!
//! - [`Param<T>`] keeps task parameters as unrendered expressions until an
//!   execution resolves them, then caches the typed value so rendering
//!   happens at most once per instance.
//! - [`StateStore`] persists named state across executions, reading through
//!   a legacy blob layout and migrating entries into the namespace-scoped
//!   key-value store as they are touched.
//!
//! Both hang off a [`RunContext`], the seam through which the surrounding
//! runtime supplies expression rendering and storage backends.

pub mod context;
pub mod error;
pub mod param;
pub mod state;
pub mod storage;
pub mod util;

pub use context::{FlowInfo, RunContext};
pub use error::{FlowStateError, KvError, ParamError, RenderError, StateError, StorageError};
pub use param::Param;
pub use state::{StateKey, StateStore, StateTier};
pub use storage::{BlobStorage, KvEntry, KvMetadata, KvStore};
