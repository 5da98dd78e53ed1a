use indexmap::IndexMap;
use rustc_hash::FxHasher;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;
use std::hash::BuildHasherDefault;

/// Insertion-ordered map; iteration and serialization follow insertion order.
pub type FastMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Field name → value. Concrete type of both the default set and the
/// working data of a record.
pub type FieldMap = FastMap<SmolStr, DtoValue>;

// ─── DtoNumber ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
pub enum DtoNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl std::fmt::Debug for DtoNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DtoNumber::I64(i) => write!(f, "I64({})", i),
            DtoNumber::U64(u) => write!(f, "U64({})", u),
            DtoNumber::F64(v) => write!(f, "F64({})", v),
        }
    }
}

impl DtoNumber {
    pub fn as_f64(self) -> f64 {
        match self {
            DtoNumber::I64(i) => i as f64,
            DtoNumber::U64(u) => u as f64,
            DtoNumber::F64(f) => f,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            DtoNumber::I64(i) => Some(i),
            DtoNumber::U64(u) => i64::try_from(u).ok(),
            DtoNumber::F64(f) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }

    pub fn as_u64(self) -> Option<u64> {
        match self {
            DtoNumber::U64(u) => Some(u),
            DtoNumber::I64(i) => u64::try_from(i).ok(),
            DtoNumber::F64(f) => {
                if f.fract() == 0.0 && f >= 0.0 && f <= u64::MAX as f64 {
                    Some(f as u64)
                } else {
                    None
                }
            }
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, DtoNumber::F64(_))
    }
}

// ─── DtoValue ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DtoValue {
    #[default]
    Null,
    Bool(bool),
    Number(DtoNumber),
    Str(SmolStr),
    Array(Vec<DtoValue>),
    Object(FieldMap),
}

/// Shared `null` handed out by non-strict lookups that found nothing.
pub(crate) static NULL: DtoValue = DtoValue::Null;

impl DtoValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DtoValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DtoValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DtoValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DtoValue::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DtoValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&FieldMap> {
        match self {
            DtoValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<DtoValue>> {
        match self {
            DtoValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DtoValue::Null)
    }

    /// Resolve a single path segment: a key on objects, a decimal index on
    /// arrays. Scalars resolve nothing.
    pub fn lookup(&self, segment: &str) -> Option<&DtoValue> {
        match self {
            DtoValue::Object(map) => map.get(segment),
            DtoValue::Array(arr) => {
                let idx = usize::try_from(canonical_int_key(segment)?).ok()?;
                arr.get(idx)
            }
            _ => None,
        }
    }

    /// Shape name used in type errors.
    pub fn shape_name(&self) -> &'static str {
        match self {
            DtoValue::Null => "null",
            DtoValue::Bool(_) => "boolean",
            DtoValue::Number(n) if n.is_float() => "double",
            DtoValue::Number(_) => "integer",
            DtoValue::Str(_) => "string",
            DtoValue::Array(_) => "array",
            DtoValue::Object(_) => "object",
        }
    }
}

/// Parses `s` as an integer only if it is written canonically
/// (`0`, `42`, `-7`; not `007`, `+1`, `-0` or `1e3`).
pub fn canonical_int_key(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let bytes = digits.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    if digits.len() != s.len() && digits == "0" {
        return None;
    }
    s.parse().ok()
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for DtoValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DtoValue::Null => serializer.serialize_none(),
            DtoValue::Bool(b) => serializer.serialize_bool(*b),
            DtoValue::Number(n) => match n {
                DtoNumber::I64(i) => serializer.serialize_i64(*i),
                DtoNumber::U64(u) => serializer.serialize_u64(*u),
                DtoNumber::F64(f) => serializer.serialize_f64(*f),
            },
            DtoValue::Str(s) => serializer.serialize_str(s.as_str()),
            DtoValue::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            DtoValue::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for DtoValue {
    fn from(n: f64) -> Self {
        DtoValue::Number(DtoNumber::F64(n))
    }
}

impl From<i64> for DtoValue {
    fn from(n: i64) -> Self {
        DtoValue::Number(DtoNumber::I64(n))
    }
}

impl From<i32> for DtoValue {
    fn from(n: i32) -> Self {
        DtoValue::Number(DtoNumber::I64(n.into()))
    }
}

impl From<u64> for DtoValue {
    fn from(n: u64) -> Self {
        DtoValue::Number(DtoNumber::U64(n))
    }
}

impl From<bool> for DtoValue {
    fn from(b: bool) -> Self {
        DtoValue::Bool(b)
    }
}

impl From<&str> for DtoValue {
    fn from(s: &str) -> Self {
        DtoValue::Str(SmolStr::from(s))
    }
}

impl From<String> for DtoValue {
    fn from(s: String) -> Self {
        DtoValue::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for DtoValue {
    fn from(s: SmolStr) -> Self {
        DtoValue::Str(s)
    }
}

impl From<FieldMap> for DtoValue {
    fn from(map: FieldMap) -> Self {
        DtoValue::Object(map)
    }
}

impl<T: Into<DtoValue>> From<Vec<T>> for DtoValue {
    fn from(items: Vec<T>) -> Self {
        DtoValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DtoValue>> From<Option<T>> for DtoValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(DtoValue::Null, Into::into)
    }
}

// ─── From/Into serde_json::Value ────────────────────────────────────────────

impl From<serde_json::Value> for DtoValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => DtoValue::Null,
            serde_json::Value::Bool(b) => DtoValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DtoValue::Number(DtoNumber::I64(i))
                } else if let Some(u) = n.as_u64() {
                    DtoValue::Number(DtoNumber::U64(u))
                } else {
                    DtoValue::Number(DtoNumber::F64(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => DtoValue::Str(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                DtoValue::Array(arr.into_iter().map(DtoValue::from).collect())
            }
            serde_json::Value::Object(obj) => DtoValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), DtoValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<DtoValue> for serde_json::Value {
    fn from(val: DtoValue) -> Self {
        match val {
            DtoValue::Null => serde_json::Value::Null,
            DtoValue::Bool(b) => serde_json::Value::Bool(b),
            DtoValue::Number(n) => match n {
                DtoNumber::I64(i) => serde_json::json!(i),
                DtoNumber::U64(u) => serde_json::json!(u),
                DtoNumber::F64(f) => serde_json::json!(f),
            },
            DtoValue::Str(s) => serde_json::Value::String(s.to_string()),
            DtoValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(|v| v.into()).collect())
            }
            DtoValue::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}

/// Builds a [`FieldMap`] in declaration order. Nested `{ ... }` blocks become
/// nested objects, `null` becomes [`DtoValue::Null`], anything else goes
/// through `DtoValue::from`.
///
/// ```
/// use dto_record::{dto_map, DtoValue};
///
/// let defaults = dto_map!({
///     "foo" => true,
///     "bar" => "string",
///     "extra" => { "a" => "b" },
///     "some" => null,
/// });
/// assert_eq!(defaults.len(), 4);
/// assert_eq!(defaults["some"], DtoValue::Null);
/// ```
#[macro_export]
macro_rules! dto_map {
    ({ $($key:expr => $val:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::FieldMap::default();
        $(
            map.insert(
                $crate::SmolStr::new($key),
                $crate::DtoValue::from($crate::dto_map!(@value $val)),
            );
        )*
        map
    }};

    (@value { $($inner:tt)* }) => {
        $crate::DtoValue::Object($crate::dto_map!({ $($inner)* }))
    };

    (@value null) => {
        $crate::DtoValue::Null
    };

    (@value $val:expr) => {
        $val
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_object_and_array() {
        let value = DtoValue::Object(crate::dto_map!({
            "list" => (vec!["x", "y"]),
        }));
        let list = value.lookup("list").unwrap();
        assert_eq!(list.lookup("1"), Some(&DtoValue::from("y")));
        assert_eq!(list.lookup("2"), None);
        assert_eq!(list.lookup("01"), None);
        assert_eq!(list.lookup("-1"), None);
        assert_eq!(DtoValue::from(5i64).lookup("0"), None);
    }

    #[test]
    fn test_canonical_int_key() {
        assert_eq!(canonical_int_key("0"), Some(0));
        assert_eq!(canonical_int_key("42"), Some(42));
        assert_eq!(canonical_int_key("-7"), Some(-7));
        assert_eq!(canonical_int_key("007"), None);
        assert_eq!(canonical_int_key("+1"), None);
        assert_eq!(canonical_int_key("-0"), None);
        assert_eq!(canonical_int_key(""), None);
        assert_eq!(canonical_int_key("-"), None);
        assert_eq!(canonical_int_key("1e3"), None);
        assert_eq!(canonical_int_key("99999999999999999999"), None);
    }

    #[test]
    fn test_shape_names() {
        assert_eq!(DtoValue::Null.shape_name(), "null");
        assert_eq!(DtoValue::from(true).shape_name(), "boolean");
        assert_eq!(DtoValue::from(123i64).shape_name(), "integer");
        assert_eq!(DtoValue::from(1.5f64).shape_name(), "double");
        assert_eq!(DtoValue::from("s").shape_name(), "string");
        assert_eq!(DtoValue::from(vec![1i64]).shape_name(), "array");
        assert_eq!(DtoValue::Object(FieldMap::default()).shape_name(), "object");
    }

    #[test]
    fn test_json_conversion_preserves_order() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"z":1,"a":{"y":true,"b":null},"m":[1.5,"s"]}"#).unwrap();
        let value = DtoValue::from(json.clone());
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(serde_json::Value::from(value), json);
    }

    #[test]
    fn test_number_conversions() {
        assert_eq!(DtoNumber::F64(3.0).as_i64(), Some(3));
        assert_eq!(DtoNumber::F64(3.5).as_i64(), None);
        assert_eq!(DtoNumber::I64(-1).as_u64(), None);
        assert_eq!(DtoNumber::U64(u64::MAX).as_i64(), None);
        assert_eq!(DtoValue::from(7u64).as_f64(), Some(7.0));
    }
}
