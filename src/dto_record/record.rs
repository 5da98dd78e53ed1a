use crate::builder::build;
use crate::dto_value::FieldMap;
use crate::error::Result;
use crate::serialization::{DtoSerializer, JsonSerializer};
use crate::types::{RecordConfig, RecordInput};
use std::rc::Rc;

// ─── Record ─────────────────────────────────────────────────────────────────
/// A set of named fields with defaults, built from a map, a structured
/// object or JSON text.
///
/// `inner_data` always holds every default key right after construction.
/// Later writes may add keys beyond the defaults or remove keys; reads of a
/// removed key fall back to `inner_defaults`.
///
/// The serializer sits behind an `Rc`, which keeps records on one thread.
#[derive(Debug, Clone)]
pub struct DtoRecord {
    pub(crate) inner_data: FieldMap,
    pub(crate) inner_defaults: FieldMap,
    pub(crate) serializer: Rc<dyn DtoSerializer>,
    pub(crate) config: RecordConfig,
}

impl DtoRecord {
    /// Build a record with a fresh [`JsonSerializer`].
    pub fn new(defaults: FieldMap, input: impl Into<RecordInput>) -> Result<Self> {
        Self::with_config(defaults, input, None, RecordConfig::default())
    }

    pub fn with_serializer(
        defaults: FieldMap,
        input: impl Into<RecordInput>,
        serializer: Rc<dyn DtoSerializer>,
    ) -> Result<Self> {
        Self::with_config(defaults, input, Some(serializer), RecordConfig::default())
    }

    /// Fails on an unsupported input shape, invalid JSON text or a reserved
    /// key in the input. Nothing is built in that case.
    pub fn with_config(
        defaults: FieldMap,
        input: impl Into<RecordInput>,
        serializer: Option<Rc<dyn DtoSerializer>>,
        config: RecordConfig,
    ) -> Result<Self> {
        let inner_data = build(&defaults, input.into(), &config)?;
        Ok(Self {
            inner_data,
            inner_defaults: defaults,
            serializer: serializer.unwrap_or_else(default_serializer),
            config,
        })
    }

    #[inline]
    pub fn defaults(&self) -> &FieldMap {
        &self.inner_defaults
    }

    #[inline]
    pub fn data(&self) -> &FieldMap {
        &self.inner_data
    }

    #[inline]
    pub fn config(&self) -> &RecordConfig {
        &self.config
    }

    #[inline]
    pub fn serializer(&self) -> &Rc<dyn DtoSerializer> {
        &self.serializer
    }

    /// Swap the bound serializer. Working data is untouched.
    pub fn set_serializer(&mut self, serializer: Rc<dyn DtoSerializer>) -> &mut Self {
        self.serializer = serializer;
        self
    }
}

fn default_serializer() -> Rc<dyn DtoSerializer> {
    Rc::new(JsonSerializer::new())
}
