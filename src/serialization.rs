use super::dto_value::{DtoNumber, DtoValue, FieldMap};
use super::error::{DtoError, Result};
use bitflags::bitflags;
use serde::Serialize;
use std::cell::Cell;
use tracing::trace;

// ─── DtoSerializer Trait ────────────────────────────────────────────────────

/// Turns a record's working data into text.
///
/// Records hold their serializer behind an `Rc`, so one instance can back
/// several records. Implementations must not depend on anything but their
/// own configuration and the data handed in.
pub trait DtoSerializer: std::fmt::Debug {
    /// Serialize the given field map.
    fn serialize(&self, data: &FieldMap) -> Result<String>;

    /// `Some` only for [`JsonSerializer`]. Lets a record reuse its bound
    /// serializer for the structured projection instead of a fresh one.
    fn as_json(&self) -> Option<&JsonSerializer> {
        None
    }
}

// ─── JsonFlags ──────────────────────────────────────────────────────────────

bitflags! {
    /// Formatting flags for [`JsonSerializer`]. Bit values follow PHP's
    /// `json_encode` constants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct JsonFlags: u32 {
        /// Arrays are written as objects keyed by index.
        const FORCE_OBJECT = 16;
        /// Newlines and four-space indentation.
        const PRETTY_PRINT = 128;
        /// Write `0` for NaN/±inf instead of failing.
        const PARTIAL_OUTPUT_ON_ERROR = 512;
    }
}

// ─── JsonSerializer ─────────────────────────────────────────────────────────

pub const DEFAULT_JSON_DEPTH: usize = 512;

/// JSON serializer with configurable flags and nesting limit.
///
/// Configuration lives in `Cell`s: changing it through any handle is visible
/// to every record sharing the instance.
#[derive(Debug)]
pub struct JsonSerializer {
    options: Cell<JsonFlags>,
    depth: Cell<usize>,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::with_options(JsonFlags::empty(), DEFAULT_JSON_DEPTH)
    }

    pub fn with_options(options: JsonFlags, depth: usize) -> Self {
        Self {
            options: Cell::new(options),
            depth: Cell::new(depth),
        }
    }

    #[inline]
    pub fn options(&self) -> JsonFlags {
        self.options.get()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    pub fn set_options(&self, options: JsonFlags) -> &Self {
        self.options.set(options);
        self
    }

    pub fn set_depth(&self, depth: usize) -> &Self {
        self.depth.set(depth);
        self
    }

    /// Serialize a single value, not just a field map.
    pub fn serialize_value(&self, value: &DtoValue) -> Result<String> {
        self.check_depth(exceeds_depth(value, self.depth()))?;
        let tree = to_json_tree(value, self.options())?;
        self.render(&tree)
    }

    fn check_depth(&self, exceeded: bool) -> Result<()> {
        if exceeded {
            let limit = self.depth();
            return Err(DtoError::SerializationError(format!(
                "maximum stack depth exceeded (limit {limit})"
            )));
        }
        Ok(())
    }

    fn render(&self, tree: &serde_json::Value) -> Result<String> {
        if !self.options().contains(JsonFlags::PRETTY_PRINT) {
            return Ok(serde_json::to_string(tree)?);
        }
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        tree.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| DtoError::SerializationError(e.to_string()))
    }
}

impl DtoSerializer for JsonSerializer {
    fn serialize(&self, data: &FieldMap) -> Result<String> {
        trace!(fields = data.len(), options = self.options().bits(), "json serialize");
        // The map itself is the outermost level.
        let limit = self.depth();
        self.check_depth(limit == 0 || data.values().any(|v| exceeds_depth(v, limit - 1)))?;
        let tree = object_tree(data, self.options())?;
        self.render(&tree)
    }

    fn as_json(&self) -> Option<&JsonSerializer> {
        Some(self)
    }
}

/// Whether arrays and objects in `value` nest more than `limit` levels.
/// Scalars are level 0. Never descends past `limit + 1` levels.
fn exceeds_depth(value: &DtoValue, limit: usize) -> bool {
    match value {
        DtoValue::Array(items) => {
            limit == 0 || items.iter().any(|item| exceeds_depth(item, limit - 1))
        }
        DtoValue::Object(map) => limit == 0 || map.values().any(|v| exceeds_depth(v, limit - 1)),
        _ => false,
    }
}

fn to_json_tree(value: &DtoValue, options: JsonFlags) -> Result<serde_json::Value> {
    Ok(match value {
        DtoValue::Null => serde_json::Value::Null,
        DtoValue::Bool(b) => serde_json::Value::Bool(*b),
        DtoValue::Number(DtoNumber::I64(i)) => serde_json::Value::from(*i),
        DtoValue::Number(DtoNumber::U64(u)) => serde_json::Value::from(*u),
        DtoValue::Number(DtoNumber::F64(f)) => match serde_json::Number::from_f64(*f) {
            Some(n) => serde_json::Value::Number(n),
            None if options.contains(JsonFlags::PARTIAL_OUTPUT_ON_ERROR) => {
                serde_json::Value::from(0)
            }
            None => {
                return Err(DtoError::SerializationError(
                    "Inf and NaN cannot be JSON encoded".to_owned(),
                ));
            }
        },
        DtoValue::Str(s) => serde_json::Value::String(s.to_string()),
        DtoValue::Array(items) if options.contains(JsonFlags::FORCE_OBJECT) => {
            let mut obj = serde_json::Map::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                obj.insert(i.to_string(), to_json_tree(item, options)?);
            }
            serde_json::Value::Object(obj)
        }
        DtoValue::Array(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| to_json_tree(item, options))
                .collect::<Result<_>>()?,
        ),
        DtoValue::Object(map) => object_tree(map, options)?,
    })
}

fn object_tree(map: &FieldMap, options: JsonFlags) -> Result<serde_json::Value> {
    let mut obj = serde_json::Map::with_capacity(map.len());
    for (k, v) in map {
        obj.insert(k.to_string(), to_json_tree(v, options)?);
    }
    Ok(serde_json::Value::Object(obj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto_map;

    #[test]
    fn test_compact_output() {
        let data = dto_map!({ "foo" => "bar" });
        let ser = JsonSerializer::new();
        assert_eq!(ser.serialize(&data).unwrap(), r#"{"foo":"bar"}"#);
    }

    #[test]
    fn test_defaults() {
        let ser = JsonSerializer::default();
        assert_eq!(ser.options(), JsonFlags::empty());
        assert_eq!(ser.depth(), 512);
    }

    #[test]
    fn test_depth_and_options() {
        let data = dto_map!({ "foo" => { "bar" => "baz" } });
        let ser = JsonSerializer::new();
        assert_eq!(ser.serialize(&data).unwrap(), r#"{"foo":{"bar":"baz"}}"#);

        ser.set_options(JsonFlags::PRETTY_PRINT);
        assert_eq!(ser.options(), JsonFlags::PRETTY_PRINT);
        assert_eq!(
            ser.serialize(&data).unwrap(),
            "{\n    \"foo\": {\n        \"bar\": \"baz\"\n    }\n}"
        );

        ser.set_depth(1);
        assert_eq!(ser.depth(), 1);
        assert!(matches!(
            ser.serialize(&data),
            Err(DtoError::SerializationError(_))
        ));

        ser.set_depth(2);
        assert!(ser.serialize(&data).is_ok());
    }

    fn nested_arrays(levels: usize) -> DtoValue {
        let mut value = DtoValue::from(1i64);
        for _ in 0..levels {
            value = DtoValue::Array(vec![value]);
        }
        value
    }

    #[test]
    fn test_exceeds_depth_boundary() {
        assert!(!exceeds_depth(&DtoValue::from("x"), 0));
        assert!(exceeds_depth(&nested_arrays(1), 0));
        assert!(!exceeds_depth(&nested_arrays(3), 3));
        assert!(exceeds_depth(&nested_arrays(4), 3));
    }

    #[test]
    fn test_deep_value_rejected_at_limit() {
        let ser = JsonSerializer::new();
        let mut data = FieldMap::default();
        data.insert("deep".into(), nested_arrays(511));
        assert!(ser.serialize(&data).is_ok());

        data.insert("deep".into(), nested_arrays(2000));
        assert!(matches!(
            ser.serialize(&data),
            Err(DtoError::SerializationError(_))
        ));
        assert!(ser.serialize_value(&nested_arrays(2000)).is_err());
    }

    #[test]
    fn test_setters_chain() {
        let ser = JsonSerializer::new();
        ser.set_options(JsonFlags::FORCE_OBJECT).set_depth(8);
        assert_eq!(ser.options(), JsonFlags::FORCE_OBJECT);
        assert_eq!(ser.depth(), 8);
    }

    #[test]
    fn test_force_object() {
        let data = dto_map!({ "list" => (vec!["a", "b"]) });
        let ser = JsonSerializer::with_options(JsonFlags::FORCE_OBJECT, DEFAULT_JSON_DEPTH);
        assert_eq!(
            ser.serialize(&data).unwrap(),
            r#"{"list":{"0":"a","1":"b"}}"#
        );
    }

    #[test]
    fn test_non_finite_float() {
        let data = dto_map!({ "x" => (f64::NAN) });
        let ser = JsonSerializer::new();
        assert!(matches!(
            ser.serialize(&data),
            Err(DtoError::SerializationError(_))
        ));

        ser.set_options(JsonFlags::PARTIAL_OUTPUT_ON_ERROR);
        assert_eq!(ser.serialize(&data).unwrap(), r#"{"x":0}"#);
    }

    #[test]
    fn test_key_order_kept() {
        let data = dto_map!({ "z" => 1, "a" => 2, "m" => 3 });
        assert_eq!(
            JsonSerializer::new().serialize(&data).unwrap(),
            r#"{"z":1,"a":2,"m":3}"#
        );
    }

    #[test]
    fn test_serialize_value() {
        let ser = JsonSerializer::new();
        assert_eq!(
            ser.serialize_value(&DtoValue::from(vec![1i64, 2])).unwrap(),
            "[1,2]"
        );
        assert_eq!(ser.serialize_value(&DtoValue::from(1.5f64)).unwrap(), "1.5");
    }

    #[test]
    fn test_as_json() {
        let ser = JsonSerializer::new();
        assert!(ser.as_json().is_some());
    }
}
