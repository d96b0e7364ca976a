//! Objects as reported by the remote management API

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::moref::ManagedObjectReference;

/// A single property value of a remote object
///
/// Deserialized from JSON without a tag; variants are tried in order, so
/// `5` becomes [`PropertyValue::Integer`] and `5.5` becomes
/// [`PropertyValue::Float`]. Anything that fits no other shape lands in
/// [`PropertyValue::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Reference(ManagedObjectReference),
    Other(serde_json::Value),
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for PropertyValue {
    /// Debug-style rendering used in error messages
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Reference(moref) => write!(f, "{moref}"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<ManagedObjectReference> for PropertyValue {
    fn from(value: ManagedObjectReference) -> Self {
        Self::Reference(value)
    }
}

/// Entity reported by the remote API
///
/// `id` is the managed object reference value (`vm-42`); `properties` is
/// keyed by property path (`runtime.powerState`). Paths that were not
/// reported are absent from the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteObject {
    pub id: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl RemoteObject {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), properties: BTreeMap::new() }
    }

    /// Builder-style property setter
    #[must_use]
    pub fn with_property(mut self, path: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(path.into(), value.into());
        self
    }

    pub fn property(&self, path: &str) -> Option<&PropertyValue> {
        self.properties.get(path)
    }
}
