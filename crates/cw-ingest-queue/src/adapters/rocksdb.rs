//! RocksDB-backed [`KeyValueStore`] for the ingest queue: a single column
//! family (`cf_events`) keyed by `event_id`, storing the event, its status,
//! and its arrival sequence number together.

use crate::domain::errors::IngestQueueError;
use crate::ports::outbound::KeyValueStore;
use rocksdb::{IteratorMode, Options, DB};
use std::path::Path;
use std::sync::Arc;

pub const CF_EVENTS: &str = "events";

#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    pub path: String,
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/ingest".to_string(),
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sync_writes: false,
        }
    }
}

pub struct RocksDbKv {
    db: DB,
    sync_writes: bool,
}

impl RocksDbKv {
    pub fn open(config: RocksDbConfig) -> Result<Self, IngestQueueError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut cf_opts = Options::default();
        cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
        let cf_descriptor = rocksdb::ColumnFamilyDescriptor::new(CF_EVENTS, cf_opts);

        let db = DB::open_cf_descriptors(&opts, &config.path, vec![cf_descriptor])
            .map_err(|e| IngestQueueError::StorageIo(format!("failed to open ingest queue rocksdb: {e}")))?;

        Ok(Self {
            db,
            sync_writes: config.sync_writes,
        })
    }

    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, IngestQueueError> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    fn cf(&self) -> &rocksdb::ColumnFamily {
        self.db.cf_handle(CF_EVENTS).expect("events column family registered at open()")
    }
}

impl KeyValueStore for RocksDbKv {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, IngestQueueError> {
        self.db
            .get_cf(self.cf(), key)
            .map_err(|e| IngestQueueError::StorageIo(format!("rocksdb get failed: {e}")))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), IngestQueueError> {
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        self.db
            .put_cf_opt(self.cf(), key, value, &write_opts)
            .map_err(|e| IngestQueueError::StorageIo(format!("rocksdb put failed: {e}")))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, IngestQueueError> {
        let mut results = Vec::new();
        let iter = self
            .db
            .iterator_cf(self.cf(), IteratorMode::From(prefix, rocksdb::Direction::Forward));
        for item in iter {
            let (key, value) = item.map_err(|e| IngestQueueError::StorageIo(format!("rocksdb scan failed: {e}")))?;
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
        }
        Ok(results)
    }
}

pub fn open_shared(config: RocksDbConfig) -> Result<Arc<RocksDbKv>, IngestQueueError> {
    Ok(Arc::new(RocksDbKv::open(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_and_round_trips_a_value() {
        let dir = tempfile::tempdir().unwrap();
        let kv = RocksDbKv::open(RocksDbConfig::for_testing(dir.path().to_string_lossy())).unwrap();
        kv.put(b"event:e-1", b"payload").unwrap();
        assert_eq!(kv.get(b"event:e-1").unwrap(), Some(b"payload".to_vec()));
    }
}
