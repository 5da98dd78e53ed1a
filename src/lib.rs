//! Records with declared defaults and several ways to read them.
//!
//! A [`DtoRecord`] is built from a default field map plus input given as an
//! ordered map, a structured object or JSON text. Every declared field gets
//! the input's value or its default; unknown input keys are dropped. Fields
//! are then read by name, by dotted path (`"a.b.0.c"`) or by iteration, and
//! written back through `set`/`unset`.
//!
//! ```
//! use dto_record::{dto_map, DtoRecord, DtoValue};
//!
//! let defaults = dto_map!({ "test1" => "1", "test2" => "2", "test3" => "3" });
//! let rec = DtoRecord::new(defaults, r#"{"test1":"one","test3":"three"}"#).unwrap();
//!
//! assert_eq!(rec.get("test2").unwrap(), &DtoValue::from("2"));
//! assert_eq!(
//!     rec.serialize().unwrap(),
//!     r#"{"test1":"one","test2":"2","test3":"three"}"#
//! );
//! ```
//!
//! Records are single-threaded: the bound serializer is shared through an
//! `Rc`, so a record is neither `Send` nor `Sync`.

pub mod builder;
pub mod declared;
pub mod deserialization;
pub mod dto_record;
pub mod dto_value;
pub mod error;
pub mod path;
pub mod php_format;
pub mod serialization;
pub mod types;

pub use declared::DeclaredFields;
pub use dto_record::DtoRecord;
pub use dto_value::{DtoNumber, DtoValue, FastMap, FieldMap};
pub use error::{DtoError, Result};
pub use php_format::PhpSerializer;
pub use serialization::{DtoSerializer, JsonFlags, JsonSerializer};
pub use smol_str::SmolStr;
pub use types::{FieldIter, PATH_SEPARATOR, RESERVED_KEYS, RecordConfig, RecordInput};
