//! Deferred task parameters
//!
//! Task definitions carry expressions, not values: a `Param<T>` holds the
//! raw expression string from the flow definition and only produces a typed
//! `T` when resolved against a running execution. Resolution happens at most
//! once per instance; every later call returns the cached value.
//!
//! On the wire a parameter is a bare scalar. `url: "{{ vars.endpoint }}"`,
//! `attempts: 3` and `verbose: true` all deserialize into a `Param` whose
//! expression is the scalar's string form.

use std::fmt;

use once_cell::sync::OnceCell;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::context::RunContext;
use crate::error::ParamError;

/// A typed parameter that resolves its expression on first use.
///
/// The cache is a single-set cell, so sharing an instance across threads is
/// safe: concurrent first resolutions are serialized and the renderer still
/// runs at most once for a successful resolution.
#[derive(Debug, Clone)]
pub struct Param<T> {
    expression: String,
    value: OnceCell<T>,
}

impl<T> Param<T> {
    /// Wrap a raw expression, leaving resolution for later.
    pub fn expr(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            value: OnceCell::new(),
        }
    }

    /// The raw expression this parameter was built from.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether a resolved value is already cached.
    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: Serialize> Param<T> {
    /// Wrap an already-known value.
    ///
    /// The value is cached up front, so resolving never invokes the
    /// renderer. The expression is set to the value's scalar form (or its
    /// JSON form for non-scalars) so the parameter still serializes like any
    /// other.
    pub fn literal(value: T) -> Self {
        let expression = match serde_json::to_value(&value) {
            Ok(Value::String(text)) => text,
            Ok(other) => other.to_string(),
            Err(err) => {
                log::warn!("Failed to encode literal parameter as an expression: {err}");
                String::new()
            }
        };
        Self {
            expression,
            value: OnceCell::with_value(value),
        }
    }
}

impl<T: serde::de::DeserializeOwned> Param<T> {
    /// Resolve the parameter against `ctx`, rendering and converting on the
    /// first call and returning the cached value on every later one.
    ///
    /// A failed attempt leaves the cache empty, so resolution can be retried.
    pub fn resolve(&self, ctx: &dyn RunContext) -> Result<&T, ParamError> {
        self.value.get_or_try_init(|| {
            let rendered = ctx.render(&self.expression)?;
            convert(rendered)
        })
    }
}

/// Convert a rendered string into the target type.
///
/// String-shaped targets take the rendered text as-is; everything else is
/// parsed from its JSON form, so `"42"` becomes `42u32` and `"true"` becomes
/// `true`.
fn convert<T: serde::de::DeserializeOwned>(rendered: String) -> Result<T, ParamError> {
    match serde_json::from_value(Value::String(rendered.clone())) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_str(&rendered).map_err(|err| ParamError::Conversion {
            rendered,
            target: std::any::type_name::<T>(),
            message: err.to_string(),
        }),
    }
}

/// Equality is defined on the expression alone; the resolution cache is a
/// runtime artifact and never part of a parameter's identity.
impl<T> PartialEq for Param<T> {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl<T> Eq for Param<T> {}

impl<T> Serialize for Param<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.expression)
    }
}

impl<'de, T> Deserialize<'de> for Param<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, number or boolean expression")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
                Ok(v.to_string())
            }
        }

        let expression = deserializer.deserialize_any(ScalarVisitor)?;
        Ok(Param::expr(expression))
    }
}
