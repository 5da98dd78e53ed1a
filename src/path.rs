use crate::dto_value::{DtoValue, FieldMap};
use crate::error::{DtoError, Result};
use crate::types::{PATH_SEPARATOR, RecordConfig};
use tracing::trace;

/// Walk a dotted path through `data`, one segment at a time.
///
/// The first segment is a field of `data`; each later segment is a key of
/// the object or an index into the array reached so far. Stops at the first
/// segment that does not resolve and names only that segment.
pub fn resolve<'a>(data: &'a FieldMap, path: &str, config: &RecordConfig) -> Result<&'a DtoValue> {
    let mut segments = path.split(PATH_SEPARATOR);
    // `split` always yields at least one item.
    let first = segments.next().unwrap_or_default();
    let mut scope = data
        .get(first)
        .filter(|v| config.is_present(v))
        .ok_or_else(|| not_found(first))?;

    for segment in segments {
        trace!(segment, shape = scope.shape_name(), "resolving path segment");
        scope = scope
            .lookup(segment)
            .filter(|v| config.is_present(v))
            .ok_or_else(|| not_found(segment))?;
    }
    Ok(scope)
}

fn not_found(segment: &str) -> DtoError {
    DtoError::PathSegmentNotFound(segment.to_owned())
}
