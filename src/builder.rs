use crate::deserialization::parse_json;
use crate::dto_value::{DtoValue, FieldMap};
use crate::error::{DtoError, Result};
use crate::serialization::DEFAULT_JSON_DEPTH;
use crate::types::{RESERVED_KEYS, RecordConfig, RecordInput};
use tracing::debug;

// ─── Build ──────────────────────────────────────────────────────────────────

/// Merge `input` against `defaults` into fresh working data.
///
/// Output holds exactly the default keys, in declared order. Each takes the
/// input's value when the input has that key and the default otherwise.
/// Input keys with no default are dropped.
pub fn build(defaults: &FieldMap, input: RecordInput, config: &RecordConfig) -> Result<FieldMap> {
    let source = normalize(input)?;
    validate_field_names(&source)?;
    Ok(merge(defaults, source, config))
}

/// Reduce the three accepted input shapes to one field map.
fn normalize(input: RecordInput) -> Result<FieldMap> {
    match input {
        RecordInput::Map(map) => Ok(map),
        RecordInput::Object(value) => into_object(value),
        RecordInput::Json(text) => {
            let parsed = parse_json(&text, DEFAULT_JSON_DEPTH).map_err(|e| {
                debug!(error = %e, "rejected JSON input");
                DtoError::InvalidJson(e.to_string())
            })?;
            if parsed.is_null() {
                debug!("rejected JSON input decoding to null");
                return Err(DtoError::InvalidJson("JSON text decodes to null".to_owned()));
            }
            into_object(parsed)
        }
    }
}

fn into_object(value: DtoValue) -> Result<FieldMap> {
    match value {
        DtoValue::Object(map) => Ok(map),
        other => {
            debug!(shape = other.shape_name(), "rejected input shape");
            Err(DtoError::InvalidInputType {
                shape: other.shape_name(),
            })
        }
    }
}

/// Top-level keys only.
fn validate_field_names(source: &FieldMap) -> Result<()> {
    for key in RESERVED_KEYS {
        if source.contains_key(key) {
            debug!(key, "rejected reserved key in input");
            return Err(DtoError::ReservedKeyConflict(key));
        }
    }
    Ok(())
}

fn merge(defaults: &FieldMap, mut source: FieldMap, config: &RecordConfig) -> FieldMap {
    let mut data = FieldMap::with_capacity_and_hasher(defaults.len(), Default::default());
    for (key, default) in defaults {
        let value = match source.swap_remove(key) {
            Some(v) if config.is_present(&v) => v,
            _ => default.clone(),
        };
        data.insert(key.clone(), value);
    }
    debug!(fields = data.len(), dropped = source.len(), "record data built");
    data
}
