//! RocksDB-backed [`KeyValueStore`], the production chain store backend.
//!
//! Two column families keep block bodies separate from the small amount of
//! metadata (tip pointer, hash index) the service also needs.

use crate::domain::errors::ChainStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;

pub const CF_BLOCKS: &str = "blocks";
pub const CF_META: &str = "meta";
const COLUMN_FAMILIES: &[&str] = &[CF_BLOCKS, CF_META];

#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    pub path: String,
    pub block_cache_size: usize,
    pub write_buffer_size: usize,
    pub max_write_buffer_number: i32,
    pub target_file_size_base: u64,
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/chain".to_string(),
            block_cache_size: 256 * 1024 * 1024,
            write_buffer_size: 64 * 1024 * 1024,
            max_write_buffer_number: 3,
            target_file_size_base: 64 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            max_write_buffer_number: 2,
            target_file_size_base: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

pub struct RocksDbKv {
    db: DB,
    sync_writes: bool,
}

impl RocksDbKv {
    pub fn open(config: RocksDbConfig) -> Result<Self, ChainStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);
        opts.set_target_file_size_base(config.target_file_size_base);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| ChainStoreError::StorageIo(format!("failed to open chain store rocksdb: {e}")))?;

        Ok(Self {
            db,
            sync_writes: config.sync_writes,
        })
    }

    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, ChainStoreError> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    fn cf_for(&self, key: &[u8]) -> &rocksdb::ColumnFamily {
        let name = if key.starts_with(b"block:") { CF_BLOCKS } else { CF_META };
        self.db.cf_handle(name).expect("column family registered at open()")
    }
}

impl KeyValueStore for RocksDbKv {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, ChainStoreError> {
        self.db
            .get_cf(self.cf_for(key), key)
            .map_err(|e| ChainStoreError::StorageIo(format!("rocksdb get failed: {e}")))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), ChainStoreError> {
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        self.db
            .put_cf_opt(self.cf_for(key), key, value, &write_opts)
            .map_err(|e| ChainStoreError::StorageIo(format!("rocksdb put failed: {e}")))
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), ChainStoreError> {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    batch.put_cf(self.cf_for(&key), &key, &value);
                }
                BatchOperation::Delete { key } => {
                    batch.delete_cf(self.cf_for(&key), &key);
                }
            }
        }
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        self.db
            .write_opt(batch, &write_opts)
            .map_err(|e| ChainStoreError::StorageIo(format!("rocksdb batch write failed: {e}")))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, ChainStoreError> {
        let cf = self.cf_for(prefix);
        let mut results = Vec::new();
        let iter = self.db.iterator_cf(cf, IteratorMode::From(prefix, rocksdb::Direction::Forward));
        for item in iter {
            let (key, value) = item.map_err(|e| ChainStoreError::StorageIo(format!("rocksdb scan failed: {e}")))?;
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
        }
        Ok(results)
    }
}

/// Shared handle suitable for `ChainStoreService<RocksDbKv>`.
pub fn open_shared(config: RocksDbConfig) -> Result<Arc<RocksDbKv>, ChainStoreError> {
    Ok(Arc::new(RocksDbKv::open(config)?))
}
