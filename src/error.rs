// ─── Error ──────────────────────────────────────────────────────────────────
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DtoError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DtoError {
    #[error("DTO can be built from map|object|json, \"{shape}\" given.")]
    InvalidInputType { shape: &'static str },
    #[error("invalid JSON input: {0}")]
    InvalidJson(String),
    #[error("reserved field \"{0}\" is not allowed in input data")]
    ReservedKeyConflict(&'static str),
    /// Carries the single segment that failed, never the full path.
    #[error("Non existent offset given in offset chain: {0}")]
    PathSegmentNotFound(String),
    #[error("Offset {0} does not exist.")]
    UnknownKey(String),
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DtoError {
    fn from(e: serde_json::Error) -> Self {
        DtoError::SerializationError(e.to_string())
    }
}
