// SPDX-License-Identifier: MIT

//! Execution context seam
//!
//! Everything that resolves expressions or touches storage goes through a
//! `RunContext`. The runtime hands one to each task execution; tests provide
//! mock implementations with canned renderings and in-memory stores.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::storage::{BlobStorage, KvStore};

/// Identity of the flow an execution belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowInfo {
    /// Dot-separated namespace, e.g. `company.team`.
    pub namespace: String,
    /// Flow identifier, unique within its namespace.
    pub flow_id: String,
    /// Revision of the flow definition, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
}

impl FlowInfo {
    pub fn new(namespace: impl Into<String>, flow_id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            flow_id: flow_id.into(),
            revision: None,
        }
    }

    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = Some(revision);
        self
    }
}

/// Per-execution services available while a task runs.
pub trait RunContext: Send + Sync {
    /// Render an expression against the execution's variables.
    ///
    /// Plain strings without expression syntax render to themselves.
    fn render(&self, expression: &str) -> Result<String, RenderError>;

    /// The flow this execution belongs to.
    fn flow_info(&self) -> FlowInfo;

    /// The blob store holding the legacy state layout.
    fn storage(&self) -> Arc<dyn BlobStorage>;

    /// The key-value store scoped to `namespace`.
    fn kv(&self, namespace: &str) -> Arc<dyn KvStore>;
}
