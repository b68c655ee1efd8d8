// SPDX-License-Identifier: MIT

//! State key derivation
//!
//! Every state entry is addressed by one ordered segment list derived from
//! the owning flow and the caller-supplied names. The same list feeds both
//! addressing schemes:
//! - the flat key-value form joins the segments with `_` and carries no
//!   namespace, because the key-value store is already namespace-scoped
//! - the legacy URI form prefixes the namespace (dots become slashes) and
//!   joins everything with `/`

use url::Url;

use crate::context::FlowInfo;
use crate::util::{slugify, stable_hash};

const LEGACY_SCHEME_BASE: &str = "flowstate:/";

/// Address of a single state entry, shared by both storage layouts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    namespace: String,
    segments: Vec<String>,
}

impl StateKey {
    /// Derive the key for a named state owned by `flow`.
    ///
    /// `sub_name` selects an inner map within the state and `correlation`
    /// isolates one logical instance (a date, a customer id, ...) from
    /// another. The correlation value is digested, never stored verbatim, so
    /// arbitrary caller data cannot produce unsafe key characters.
    pub fn derive(
        flow: &FlowInfo,
        name: &str,
        sub_name: Option<&str>,
        correlation: Option<&str>,
    ) -> Self {
        let qualified_name = match sub_name {
            Some(sub_name) => format!("{name}_{sub_name}"),
            None => name.to_string(),
        };

        let mut segments = vec![slugify(&flow.flow_id), "states".to_string(), qualified_name];
        if let Some(correlation) = correlation {
            segments.push(stable_hash(correlation));
        }

        Self {
            namespace: flow.namespace.clone(),
            segments,
        }
    }

    /// Namespace of the owning flow.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Flat form used by the key-value store.
    pub fn flat(&self) -> String {
        self.segments.join("_")
    }

    /// Hierarchical URI of the entry in the legacy blob layout.
    pub fn legacy_uri(&self) -> Url {
        let mut path = String::new();
        for part in self.namespace.split('.') {
            path.push('/');
            path.push_str(part);
        }
        for segment in &self.segments {
            path.push('/');
            path.push_str(segment);
        }

        // The base is a constant scheme prefix; only the path varies, and
        // `set_path` percent-encodes anything the path cannot carry.
        let mut uri = Url::parse(LEGACY_SCHEME_BASE).expect("legacy scheme base is a valid URI");
        uri.set_path(&path);
        uri
    }
}
