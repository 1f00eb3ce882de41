//! Driven port: the storage backend the chain store service runs on.
//!
//! Production uses [`crate::adapters::rocksdb::RocksDbKv`]; tests and the
//! in-process integration harness use [`InMemoryKv`].

use crate::domain::errors::ChainStoreError;

/// A single logical key-value namespace. Backends are free to shard keys
/// across column families internally (the RocksDB backend does, by prefix)
/// as long as `get`/`put`/`prefix_scan` behave as one flat namespace.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, ChainStoreError>;
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), ChainStoreError>;
    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), ChainStoreError>;
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, ChainStoreError>;
}

#[derive(Debug, Clone)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// In-memory key-value store for tests and the in-process integration
/// harness. Not durable across restarts.
#[derive(Default)]
pub struct InMemoryKv {
    data: parking_lot::RwLock<std::collections::HashMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKv {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, ChainStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), ChainStoreError> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), ChainStoreError> {
        let mut guard = self.data.write();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    guard.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    guard.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, ChainStoreError> {
        let guard = self.data.read();
        let mut results: Vec<_> = guard
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        results.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(results)
    }
}
