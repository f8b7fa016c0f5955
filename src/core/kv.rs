//! Key-value persistence capability consumed by the scenario store.

use crate::core::error::Result;

/// String-valued key-value storage. Implementations report failures as
/// [`Error::StorageUnavailable`](crate::core::error::Error::StorageUnavailable).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
