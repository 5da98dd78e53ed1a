use crate::dto_value::{DtoNumber, DtoValue, FieldMap, canonical_int_key};
use crate::error::{DtoError, Result};
use crate::serialization::DtoSerializer;
use std::fmt::{self, Write};

// ─── PHP serialize() text format ────────────────────────────────────────────
//
//  null    N;
//  bool    b:0;  b:1;
//  int     i:<n>;      unsigned values past i64::MAX go out as d:
//  float   d:<shortest repr>;   d:INF;  d:-INF;  d:NAN;
//  string  s:<byte len>:"<bytes>";
//  array   a:<n>:{<key><value>...}      keys are i:<n>; or s:..;
//
// Objects and arrays both come out as `a:`; a key that is a canonical
// decimal integer is written as an integer key.

/// Serializer for PHP's `serialize()` format.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpSerializer;

impl DtoSerializer for PhpSerializer {
    fn serialize(&self, data: &FieldMap) -> Result<String> {
        let mut out = String::new();
        write_map(&mut out, data).map_err(|e| DtoError::SerializationError(e.to_string()))?;
        Ok(out)
    }
}

fn write_value(out: &mut String, value: &DtoValue) -> fmt::Result {
    match value {
        DtoValue::Null => out.write_str("N;"),
        DtoValue::Bool(b) => write!(out, "b:{};", u8::from(*b)),
        DtoValue::Number(DtoNumber::I64(i)) => write!(out, "i:{};", i),
        DtoValue::Number(DtoNumber::U64(u)) => match i64::try_from(*u) {
            Ok(i) => write!(out, "i:{};", i),
            // Past PHP_INT_MAX; PHP promotes to float.
            Err(_) => write_float(out, *u as f64),
        },
        DtoValue::Number(DtoNumber::F64(f)) => write_float(out, *f),
        DtoValue::Str(s) => write_php_str(out, s),
        DtoValue::Array(items) => {
            write!(out, "a:{}:{{", items.len())?;
            for (i, item) in items.iter().enumerate() {
                write!(out, "i:{};", i)?;
                write_value(out, item)?;
            }
            out.write_char('}')
        }
        DtoValue::Object(map) => write_map(out, map),
    }
}

fn write_map(out: &mut String, map: &FieldMap) -> fmt::Result {
    write!(out, "a:{}:{{", map.len())?;
    for (key, value) in map {
        match canonical_int_key(key) {
            Some(i) => write!(out, "i:{};", i)?,
            None => write_php_str(out, key)?,
        }
        write_value(out, value)?;
    }
    out.write_char('}')
}

fn write_php_str(out: &mut String, s: &str) -> fmt::Result {
    write!(out, "s:{}:\"{}\";", s.len(), s)
}

fn write_float(out: &mut String, f: f64) -> fmt::Result {
    if f.is_nan() {
        out.write_str("d:NAN;")
    } else if f.is_infinite() {
        out.write_str(if f > 0.0 { "d:INF;" } else { "d:-INF;" })
    } else {
        write!(out, "d:{};", f)
    }
}
