use super::record::DtoRecord;
use crate::dto_value::DtoValue;
use smol_str::SmolStr;

impl DtoRecord {
    /// Write a field, adding it if new. New keys go after existing ones;
    /// overwriting keeps a key's position.
    pub fn set(&mut self, key: impl Into<SmolStr>, value: impl Into<DtoValue>) -> &mut Self {
        self.inner_data.insert(key.into(), value.into());
        self
    }

    /// Remove a field from the working data only. Its default, if any, is
    /// what `get` returns afterwards.
    pub fn unset(&mut self, key: &str) -> Option<DtoValue> {
        self.inner_data.shift_remove(key)
    }

    /// Overwrite or add a default. The working data is left alone.
    pub fn set_default(&mut self, key: impl Into<SmolStr>, value: impl Into<DtoValue>) -> &mut Self {
        self.inner_defaults.insert(key.into(), value.into());
        self
    }
}

impl<K: Into<SmolStr>, V: Into<DtoValue>> Extend<(K, V)> for DtoRecord {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}
