use crate::dto_value::{DtoValue, FieldMap};
use crate::error::Result;
use serde::Serialize;
use smol_str::SmolStr;

// ─── Reserved names ─────────────────────────────────────────────────────────

/// Names of the record's own storage fields. Input payloads may not use them
/// as top-level keys.
pub const RESERVED_KEYS: [&str; 2] = ["inner_data", "inner_defaults"];

/// Separator between segments of a dotted path.
pub const PATH_SEPARATOR: char = '.';

// ─── RecordInput ────────────────────────────────────────────────────────────

/// Raw data a record is built from.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordInput {
    /// An ordered field map.
    Map(FieldMap),
    /// A structured value. Only [`DtoValue::Object`] is accepted; any other
    /// shape is rejected when the record is built.
    Object(DtoValue),
    /// JSON text, parsed before merging.
    Json(String),
}

impl RecordInput {
    /// The conventional "use all defaults" input.
    pub fn empty() -> Self {
        RecordInput::Map(FieldMap::default())
    }

    /// Structured object input from any serializable value (typically a
    /// struct with named fields).
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value)?;
        Ok(RecordInput::Object(DtoValue::from(json)))
    }

    /// Name of the input shape, as reported in type errors.
    pub fn shape_name(&self) -> &'static str {
        match self {
            RecordInput::Map(_) => "array",
            RecordInput::Object(value) => value.shape_name(),
            RecordInput::Json(_) => "string",
        }
    }
}

impl Default for RecordInput {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<FieldMap> for RecordInput {
    fn from(map: FieldMap) -> Self {
        RecordInput::Map(map)
    }
}

impl From<DtoValue> for RecordInput {
    fn from(value: DtoValue) -> Self {
        RecordInput::Object(value)
    }
}

impl From<serde_json::Value> for RecordInput {
    fn from(value: serde_json::Value) -> Self {
        RecordInput::Object(DtoValue::from(value))
    }
}

impl From<&str> for RecordInput {
    fn from(text: &str) -> Self {
        RecordInput::Json(text.to_owned())
    }
}

impl From<String> for RecordInput {
    fn from(text: String) -> Self {
        RecordInput::Json(text)
    }
}

// ─── RecordConfig ───────────────────────────────────────────────────────────

/// Construction-time options for [`crate::DtoRecord::with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordConfig {
    /// Treat `null` as "not there".
    ///
    /// During the merge a `null` input value then loses to the default, and
    /// a `null` met while walking a dotted path makes that segment
    /// unresolvable.
    ///
    /// Default: `false` (a key mapped to `null` is present).
    pub null_is_missing: bool,
}

impl RecordConfig {
    #[inline]
    pub(crate) fn is_present(&self, value: &DtoValue) -> bool {
        !(self.null_is_missing && value.is_null())
    }
}

// ─── Iterator ───────────────────────────────────────────────────────────────

/// Iterates a record's working data in insertion order.
pub struct FieldIter<'a> {
    pub(crate) inner: indexmap::map::Iter<'a, SmolStr, DtoValue>,
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = (&'a str, &'a DtoValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> DoubleEndedIterator for FieldIter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> ExactSizeIterator for FieldIter<'a> {}

