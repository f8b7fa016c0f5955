use crate::core::error::{Error, Result};
use crate::core::kv::KeyValueStore;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory store backed by a `HashMap`. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::StorageUnavailable("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.inner.read().map_err(poisoned)?;
        let value = map.get(key).cloned();
        if value.is_some() {
            debug!("Store HIT for key: {key}");
        } else {
            debug!("Store MISS for key: {key}");
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.inner.write().map_err(poisoned)?;
        debug!("Store SET for key: {key}");
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
