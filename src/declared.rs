//! Declaring a record's field set on a type instead of passing a map.
//!
//! Two ways: implement [`DeclaredFields`] (usually with [`crate::dto_map!`]),
//! or hand a `Serialize` struct value to [`DtoRecord::from_struct_defaults`],
//! whose fields and their values become the defaults in declaration order.

use crate::dto_record::DtoRecord;
use crate::dto_value::{DtoValue, FieldMap};
use crate::error::{DtoError, Result};
use crate::types::RecordInput;
use serde::Serialize;

/// A type that declares a record's fields and their defaults.
pub trait DeclaredFields {
    fn declared_defaults() -> FieldMap;
}

/// Field map of a serializable struct value. Anything that does not
/// serialize to an object (a tuple struct, a scalar) is rejected.
pub fn defaults_from<T: Serialize + ?Sized>(declaration: &T) -> Result<FieldMap> {
    match DtoValue::from(serde_json::to_value(declaration)?) {
        DtoValue::Object(map) => Ok(map),
        other => Err(DtoError::InvalidInputType {
            shape: other.shape_name(),
        }),
    }
}

impl DtoRecord {
    pub fn declared<T: DeclaredFields>(input: impl Into<RecordInput>) -> Result<Self> {
        Self::new(T::declared_defaults(), input)
    }

    pub fn from_struct_defaults<T: Serialize + ?Sized>(
        declaration: &T,
        input: impl Into<RecordInput>,
    ) -> Result<Self> {
        Self::new(defaults_from(declaration)?, input)
    }
}
