use crate::dto_value::{DtoValue, FieldMap};
use crate::error::{DtoError, Result};
use serde::Deserialize;
use serde::de::{DeserializeOwned, Error as _};

// ─── JSON text → DtoValue ───────────────────────────────────────────────────

/// Parse JSON text into a [`DtoValue`], keeping object keys in document order.
///
/// Text whose arrays and objects nest deeper than `max_depth` is rejected
/// before any value is built. The parser itself runs without serde_json's
/// fixed recursion limit and grows its stack on demand.
pub fn parse_json(
    text: &str,
    max_depth: usize,
) -> std::result::Result<DtoValue, serde_json::Error> {
    if let Some(depth) = exceeds_nesting(text, max_depth) {
        return Err(serde_json::Error::custom(format!(
            "maximum nesting depth {max_depth} exceeded ({depth} levels)"
        )));
    }
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let json = serde_json::Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(DtoValue::from(json))
}

/// Bracket nesting of `text`, ignoring brackets inside strings. Returns the
/// depth reached as soon as it passes `max_depth`.
fn exceeds_nesting(text: &str, max_depth: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > max_depth {
                    return Some(depth);
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// Decode JSON serializer output back into a field map. Anything but an
/// object is a serialization error.
pub fn decode_map(text: &str, max_depth: usize) -> Result<FieldMap> {
    match parse_json(text, max_depth)? {
        DtoValue::Object(map) => Ok(map),
        other => Err(DtoError::SerializationError(format!(
            "expected a JSON object, got {}",
            other.shape_name()
        ))),
    }
}

// ─── DtoValue → typed ───────────────────────────────────────────────────────

/// Decode a value into any `DeserializeOwned` type. `None` if the shapes
/// don't line up.
pub fn from_value<T: DeserializeOwned>(value: &DtoValue) -> Option<T> {
    serde_json::from_value(serde_json::Value::from(value.clone())).ok()
}
