//! Record field access and scalar field values.
//!
//! The engine never looks inside a record directly; it resolves named fields
//! through the [`FieldAccess`] trait and works on the returned [`FieldValue`]
//! scalars. A built-in implementation for [`serde_json::Value`] resolves
//! dotted paths (`"a.b.c"`), so JSON documents are searchable out of the box.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar value resolved from a record field.
///
/// Integers and floats compare numerically with each other; all other
/// cross-type comparisons are undefined (`partial_cmp` returns `None`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text value.
    Text(String),
    /// Signed integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
}

impl FieldValue {
    /// Numeric view of this value, if it is a number.
    fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => None,
            },
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Field access for searchable records.
///
/// The engine resolves every field it touches (filter fields, sort field,
/// searchable fields, facet fields, the `id` field) through this trait.
/// Returning `None` marks the field as absent: an absent field fails filter
/// predicates, sorts first under ascending order, is skipped by facet
/// counting, and contributes no match score.
pub trait FieldAccess {
    /// Resolve a field by name.
    fn field(&self, path: &str) -> Option<FieldValue>;
}

impl FieldAccess for serde_json::Value {
    fn field(&self, path: &str) -> Option<FieldValue> {
        resolve_path(self, path)
    }
}

/// Resolve a dotted path (`"a.b.c"`) against a JSON value.
///
/// Any missing segment, or a traversal step through a non-object, yields
/// `None`. Leaves that are not scalars (`null`, arrays, objects) also
/// resolve as absent.
pub fn resolve_path(value: &serde_json::Value, path: &str) -> Option<FieldValue> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    match current {
        serde_json::Value::String(s) => Some(FieldValue::Text(s.clone())),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Some(FieldValue::Integer(i)),
            None => n.as_f64().map(FieldValue::Float),
        },
        serde_json::Value::Bool(b) => Some(FieldValue::Bool(*b)),
        _ => None,
    }
}
