// SPDX-License-Identifier: MIT

//! Typed error handling for flowstate-rs
//!
//! One enum per seam (rendering, parameter conversion, blob storage,
//! key-value storage, state store) plus a top-level error that aggregates
//! them for callers that do not care which layer failed.

use thiserror::Error;

/// Top-level error type for flowstate-rs
#[derive(Debug, Error)]
pub enum FlowStateError {
    /// Parameter rendering or conversion errors
    #[error(transparent)]
    Param(#[from] ParamError),

    /// State store errors
    #[error(transparent)]
    State(#[from] StateError),

    /// Template rendering errors
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Blob storage errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Key-value storage errors
    #[error(transparent)]
    Kv(#[from] KvError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error wrapper for compatibility
    #[error("{0}")]
    Other(String),
}

/// Errors produced by the execution context's template renderer
#[derive(Debug, Error)]
pub enum RenderError {
    /// The expression refers to a variable the context cannot resolve
    #[error("unresolved reference '{reference}' in expression '{expression}'")]
    UnresolvedReference {
        expression: String,
        reference: String,
    },

    /// The expression is not valid template syntax
    #[error("invalid expression '{expression}': {message}")]
    InvalidExpression { expression: String, message: String },

    /// Renderer-specific failure that fits no other variant
    #[error("{0}")]
    Other(String),
}

/// Errors from resolving a dynamic parameter
#[derive(Debug, Error)]
pub enum ParamError {
    /// The renderer failed to evaluate the expression
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The rendered string could not be converted to the target type
    #[error("cannot convert rendered value '{rendered}' to {target}: {message}")]
    Conversion {
        rendered: String,
        target: &'static str,
        message: String,
    },
}

/// Errors from the legacy blob storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// No file exists at the given URI
    #[error("file not found: {uri}")]
    NotFound { uri: String },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Backend-specific failure (connection, permissions, ...)
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors from the key-value storage backend
#[derive(Debug, Error)]
pub enum KvError {
    /// The entry exists but its time-to-live has elapsed
    #[error("value for key '{key}' has expired")]
    Expired { key: String },

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Backend-specific failure (connection, permissions, ...)
    #[error("key-value backend error: {0}")]
    Backend(String),
}

/// Errors from the tiered state store
#[derive(Debug, Error)]
pub enum StateError {
    /// No entry exists in any tier for the derived key
    #[error("state {key} not found")]
    NotFound { key: String },

    /// Blob storage fault while reading or deleting a legacy entry
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Key-value fault while reading, writing or deleting an entry
    #[error(transparent)]
    Kv(#[from] KvError),
}

impl RenderError {
    /// Create an unresolved-reference error
    pub fn unresolved(expression: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            expression: expression.into(),
            reference: reference.into(),
        }
    }

    /// Create an invalid-expression error
    pub fn invalid(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidExpression {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

impl StorageError {
    /// Create a not-found error for the given URI
    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::NotFound { uri: uri.into() }
    }

    /// True when the error unambiguously means "nothing stored there",
    /// as opposed to a transient backend fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl FlowStateError {
    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

// Allow conversion from &str for ad-hoc error sites
impl From<&str> for FlowStateError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for FlowStateError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}
