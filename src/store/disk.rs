use crate::core::error::{Error, Result};
use crate::core::kv::KeyValueStore;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "resale";

/// Persistent store backed by a `fjall` keyspace. Every write is synced to
/// disk before returning.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

fn unavailable(e: impl std::fmt::Display) -> Error {
    Error::StorageUnavailable(e.to_string())
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening disk store at {}", path.display());
        std::fs::create_dir_all(path).map_err(unavailable)?;

        let keyspace = fjall::Config::new(path).open().map_err(unavailable)?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .map_err(unavailable)?;
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.partition.get(key).map_err(unavailable)? {
            Some(bytes) => {
                debug!("Store HIT for key: {key}");
                String::from_utf8(bytes.to_vec())
                    .map(Some)
                    .map_err(unavailable)
            }
            None => {
                debug!("Store MISS for key: {key}");
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.partition
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(unavailable)?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .map_err(unavailable)?;
        debug!("Store SET for key: {key}");
        Ok(())
    }
}
