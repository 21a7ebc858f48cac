//! Observability trait for inspecting component state.
//!
//! Every peripheral exposes its registers and internal state for debugging.
//! Queries never affect emulation state: no value providers run, no read
//! side effects fire.

use std::collections::BTreeMap;
use std::fmt;

/// A dynamically-typed value for state queries.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Boolean value (single-bit fields, flags).
    Bool(bool),
    /// 32-bit unsigned integer (registers, multi-bit fields).
    U32(u32),
    /// 64-bit unsigned integer (tick counts).
    U64(u64),
    /// Enumerated field: the raw code and its name, if the code is named.
    Enum { code: u32, name: Option<&'static str> },
    /// Free-form text (state machine names).
    String(String),
    /// Map of string keys to values, ordered by key.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Numeric view of the value, if it has one.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Bool(v) => Some(u64::from(*v)),
            Value::U32(v) | Value::Enum { code: v, .. } => Some(u64::from(*v)),
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v:#010X}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::Enum {
                code,
                name: Some(name),
            } => write!(f, "{name} ({code})"),
            Value::Enum { code, name: None } => write!(f, "{code}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Map(map) => {
                let entries: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", entries.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// A component whose state can be inspected.
///
/// Queries never affect emulation state.
pub trait Observable {
    /// Query a specific property by path.
    ///
    /// Paths are hierarchical, separated by dots:
    /// - `STATUS` - a whole register
    /// - `STATUS.RDY` - one field of it
    /// - `timer.value` - internal model state
    ///
    /// Returns `None` if the path is not recognised.
    fn query(&self, path: &str) -> Option<Value>;

    /// List all available query paths.
    fn query_paths(&self) -> Vec<String>;
}
