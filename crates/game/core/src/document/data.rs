//! Prepared document data: a tree of named fields rebuilt every pass.
//!
//! Leaves are plain values (boolean, number, string) or accumulators
//! ([`CompositeNumber`], [`CompositeResource`], [`SpecialValue`]). Rules read
//! and write the tree only through [`PropertyPath`]s.

use std::collections::BTreeMap;

use serde::Serialize;

use super::path::PropertyPath;
use crate::stats::{CompositeNumber, CompositeResource, SpecialValue};

/// Runtime type of a data value, used in diagnostics.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr,
)]
pub enum ValueType {
    #[serde(rename = "boolean")]
    #[strum(serialize = "boolean")]
    Bool,
    #[serde(rename = "number")]
    #[strum(serialize = "number")]
    Number,
    #[serde(rename = "string")]
    #[strum(serialize = "string")]
    Text,
    #[serde(rename = "CompositeNumber")]
    #[strum(serialize = "CompositeNumber")]
    Composite,
    #[serde(rename = "CompositeResource")]
    #[strum(serialize = "CompositeResource")]
    Resource,
    #[serde(rename = "SPECIAL")]
    #[strum(serialize = "SPECIAL")]
    Special,
    #[serde(rename = "object")]
    #[strum(serialize = "object")]
    Object,
}

impl ValueType {
    /// Plain values can be replaced wholesale.
    pub const fn is_plain(&self) -> bool {
        matches!(self, Self::Bool | Self::Number | Self::Text)
    }
}

/// A single field value in a document's data tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Composite(CompositeNumber),
    Resource(CompositeResource),
    Special(SpecialValue),
    Object(DataObject),
}

impl DataValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Number(_) => ValueType::Number,
            Self::Text(_) => ValueType::Text,
            Self::Composite(_) => ValueType::Composite,
            Self::Resource(_) => ValueType::Resource,
            Self::Special(_) => ValueType::Special,
            Self::Object(_) => ValueType::Object,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeNumber> {
        match self {
            Self::Composite(value) => Some(value),
            Self::Resource(value) => Some(&value.number),
            _ => None,
        }
    }

    pub fn as_special(&self) -> Option<&SpecialValue> {
        match self {
            Self::Special(value) => Some(value),
            _ => None,
        }
    }

    /// Numeric reading of the value: plain numbers and accumulator totals.
    pub fn total(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Composite(value) => Some(value.total()),
            Self::Resource(value) => Some(value.total()),
            Self::Special(value) => Some(value.temporary_total()),
            _ => None,
        }
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<CompositeNumber> for DataValue {
    fn from(value: CompositeNumber) -> Self {
        Self::Composite(value)
    }
}

impl From<CompositeResource> for DataValue {
    fn from(value: CompositeResource) -> Self {
        Self::Resource(value)
    }
}

impl From<SpecialValue> for DataValue {
    fn from(value: SpecialValue) -> Self {
        Self::Special(value)
    }
}

impl From<DataObject> for DataValue {
    fn from(value: DataObject) -> Self {
        Self::Object(value)
    }
}

/// Where a path stopped resolving.
///
/// `depth` is the index of the first segment that was not found; `0` means
/// the document has no such root field at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathMiss {
    pub depth: usize,
}

impl PathMiss {
    pub const fn is_root(&self) -> bool {
        self.depth == 0
    }
}

/// An object node: named fields in stable (sorted) order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataObject {
    fields: BTreeMap<String, DataValue>,
}

impl DataObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DataValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Insert a field (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut DataValue> {
        self.fields.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Follow a path through nested objects.
    pub fn resolve(&self, path: &PropertyPath) -> Result<&DataValue, PathMiss> {
        let segments = path.segments();
        let mut current = self
            .fields
            .get(&segments[0])
            .ok_or(PathMiss { depth: 0 })?;

        for (depth, segment) in segments.iter().enumerate().skip(1) {
            current = match current {
                DataValue::Object(object) => object
                    .fields
                    .get(segment)
                    .ok_or(PathMiss { depth })?,
                _ => return Err(PathMiss { depth }),
            };
        }

        Ok(current)
    }

    /// Mutable counterpart of [`DataObject::resolve`].
    pub fn resolve_mut(&mut self, path: &PropertyPath) -> Result<&mut DataValue, PathMiss> {
        let segments = path.segments();
        let mut current = self
            .fields
            .get_mut(&segments[0])
            .ok_or(PathMiss { depth: 0 })?;

        for (depth, segment) in segments.iter().enumerate().skip(1) {
            current = match current {
                DataValue::Object(object) => object
                    .fields
                    .get_mut(segment)
                    .ok_or(PathMiss { depth })?,
                _ => return Err(PathMiss { depth }),
            };
        }

        Ok(current)
    }
}
