//! Driven port: identical shape to the chain store's `KeyValueStore`, kept
//! as a separate trait per crate so each storage-backed service owns its
//! own port rather than sharing a cross-crate trait object.

use crate::domain::errors::IngestQueueError;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, IngestQueueError>;
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), IngestQueueError>;
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, IngestQueueError>;
}

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
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, IngestQueueError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), IngestQueueError> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, IngestQueueError> {
        let guard = self.data.read();
        Ok(guard
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let kv = InMemoryKv::new();
        kv.put(b"event:e-1", b"data").unwrap();
        assert_eq!(kv.get(b"event:e-1").unwrap(), Some(b"data".to_vec()));
    }

    #[test]
    fn prefix_scan_matches_only_the_prefix() {
        let kv = InMemoryKv::new();
        kv.put(b"event:e-1", b"a").unwrap();
        kv.put(b"other:x", b"b").unwrap();
        assert_eq!(kv.prefix_scan(b"event:").unwrap().len(), 1);
    }
}
