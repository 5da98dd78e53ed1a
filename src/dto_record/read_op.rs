use super::record::DtoRecord;
use crate::deserialization::{decode_map, from_value};
use crate::dto_value::{DtoValue, FieldMap, NULL};
use crate::error::{DtoError, Result};
use crate::path;
use crate::serialization::{DtoSerializer, JsonSerializer};
use crate::types::{FieldIter, PATH_SEPARATOR};
use serde::de::DeserializeOwned;
use std::ops::Index;
use tracing::trace;

impl DtoRecord {
    // ════════════════════════════════════════════════════════════════════════
    // Lookup
    // ════════════════════════════════════════════════════════════════════════

    /// Non-strict lookup. A plain key missing from both the data and the
    /// defaults reads as `null`.
    #[inline]
    pub fn get(&self, key: &str) -> Result<&DtoValue> {
        self.get_with(key, false)
    }

    /// Like [`get`](Self::get) but an unknown plain key is an error.
    #[inline]
    pub fn get_strict(&self, key: &str) -> Result<&DtoValue> {
        self.get_with(key, true)
    }

    /// A key containing `.` is walked as a path through the working data,
    /// with no default fallback anywhere along it. `strict` only affects
    /// plain keys.
    pub fn get_with(&self, key: &str, strict: bool) -> Result<&DtoValue> {
        if key.contains(PATH_SEPARATOR) {
            return path::resolve(&self.inner_data, key, &self.config);
        }
        if let Some(value) = self.inner_data.get(key) {
            return Ok(value);
        }
        if let Some(value) = self.inner_defaults.get(key) {
            return Ok(value);
        }
        if strict {
            return Err(DtoError::UnknownKey(key.to_owned()));
        }
        Ok(&NULL)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Typed getters (non-strict; None on any mismatch)
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).ok()?.as_str()
    }

    #[inline]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).ok()?.as_i64()
    }

    #[inline]
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).ok()?.as_u64()
    }

    #[inline]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).ok()?.as_f64()
    }

    #[inline]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).ok()?.as_bool()
    }

    /// Decode a field (or a path) into a typed value.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        from_value(self.get(key).ok()?)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Presence / size / iteration
    // ════════════════════════════════════════════════════════════════════════

    /// Whether the working data holds `key`. Defaults are not consulted.
    #[inline]
    pub fn has(&self, key: &str) -> bool {
        self.inner_data
            .get(key)
            .is_some_and(|v| self.config.is_present(v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner_data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner_data.is_empty()
    }

    /// Fields in insertion order: declared defaults first, then keys added
    /// by later writes.
    #[inline]
    pub fn iter(&self) -> FieldIter<'_> {
        FieldIter {
            inner: self.inner_data.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner_data.keys().map(|k| k.as_str())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Serialization
    // ════════════════════════════════════════════════════════════════════════

    /// Working data through the bound serializer.
    pub fn serialize(&self) -> Result<String> {
        trace!(fields = self.inner_data.len(), "serializing record");
        self.serializer.serialize(&self.inner_data)
    }

    /// JSON round-trip of the working data, whatever serializer is bound.
    /// A bound [`JsonSerializer`] is reused with its flags and depth.
    pub fn to_map(&self) -> Result<FieldMap> {
        let (text, depth) = match self.serializer.as_json() {
            Some(json) => (json.serialize(&self.inner_data)?, json.depth()),
            None => {
                let json = JsonSerializer::new();
                (json.serialize(&self.inner_data)?, json.depth())
            }
        };
        decode_map(&text, depth)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(DtoValue::Object(self.to_map()?).into())
    }
}

/// Panics where [`DtoRecord::get`] would return an error, like indexing a
/// map with a missing key.
impl Index<&str> for DtoRecord {
    type Output = DtoValue;

    fn index(&self, key: &str) -> &DtoValue {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<'a> IntoIterator for &'a DtoRecord {
    type Item = (&'a str, &'a DtoValue);
    type IntoIter = FieldIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
