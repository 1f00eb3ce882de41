//! Append-only chain store: every write goes through [`ChainStoreService`],
//! which enforces the genesis anchor and the previous-hash link before a
//! block is allowed to land.

use crate::domain::errors::ChainStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use cw_types::{Block, GenesisAnchor, Hash32};
use std::sync::Arc;

const BLOCK_PREFIX: &[u8] = b"block:";
const HASH_INDEX_PREFIX: &[u8] = b"hash:";
const TIP_KEY: &[u8] = b"meta:tip";

fn block_key(index: u64) -> Vec<u8> {
    let mut key = BLOCK_PREFIX.to_vec();
    key.extend_from_slice(format!("{index:020}").as_bytes());
    key
}

fn hash_index_key(hash: &Hash32) -> Vec<u8> {
    let mut key = HASH_INDEX_PREFIX.to_vec();
    key.extend_from_slice(hash.to_hex().as_bytes());
    key
}

fn encode_block(block: &Block) -> Result<Vec<u8>, ChainStoreError> {
    serde_json::to_vec(block).map_err(|e| ChainStoreError::StorageIo(e.to_string()))
}

fn decode_block(bytes: &[u8]) -> Result<Block, ChainStoreError> {
    serde_json::from_slice(bytes).map_err(|e| ChainStoreError::StorageIo(e.to_string()))
}

/// The append-only chain store service, generic over its storage backend.
pub struct ChainStoreService<KV: KeyValueStore> {
    kv: Arc<KV>,
    genesis: GenesisAnchor,
}

impl<KV: KeyValueStore> ChainStoreService<KV> {
    pub fn new(kv: Arc<KV>, genesis: GenesisAnchor) -> Self {
        Self { kv, genesis }
    }

    /// Append `block` to the chain.
    ///
    /// - index 0 must match the fixed genesis anchor exactly (I3), and is
    ///   only accepted when the store is empty.
    /// - any other index must be exactly `tip().index + 1` and must carry
    ///   `previous_hash == tip().block_hash` (I1/I2).
    pub fn append(&self, block: Block) -> Result<(), ChainStoreError> {
        let tip = self.tip()?;

        if block.index == 0 {
            if tip.is_some() {
                return Err(ChainStoreError::IndexOccupied { index: 0 });
            }
            if !self.genesis.matches(&block) {
                return Err(ChainStoreError::GenesisViolation);
            }
        } else {
            let tip = tip.ok_or(ChainStoreError::BrokenLink {
                index: block.index,
                expected: Hash32::zero().to_hex(),
                actual: block.previous_hash.to_hex(),
            })?;
            if block.index != tip.index + 1 {
                return Err(ChainStoreError::IndexOccupied { index: block.index });
            }
            if block.previous_hash != tip.block_hash {
                return Err(ChainStoreError::BrokenLink {
                    index: block.index,
                    expected: tip.block_hash.to_hex(),
                    actual: block.previous_hash.to_hex(),
                });
            }
        }

        let encoded = encode_block(&block)?;
        self.kv.atomic_batch_write(vec![
            BatchOperation::put(block_key(block.index), encoded),
            BatchOperation::put(hash_index_key(&block.block_hash), block.index.to_le_bytes().to_vec()),
            BatchOperation::put(TIP_KEY.to_vec(), block.index.to_le_bytes().to_vec()),
        ])?;
        tracing::debug!(index = block.index, "block appended to chain store");
        Ok(())
    }

    /// Append the genesis block if the store is still empty.
    ///
    /// Called once at startup before the consensus engine accepts any
    /// events (spec section 4.4.5): a store that already holds a tip is
    /// left untouched, so this is safe to call on every restart.
    pub fn ensure_genesis(&self) -> Result<(), ChainStoreError> {
        if self.tip()?.is_none() {
            self.append(self.genesis.block())?;
        }
        Ok(())
    }

    /// The current tip, or `None` if the store is still empty.
    pub fn tip(&self) -> Result<Option<Block>, ChainStoreError> {
        match self.kv.get(TIP_KEY)? {
            Some(bytes) => {
                let index = u64::from_le_bytes(bytes.try_into().map_err(|_| {
                    ChainStoreError::StorageIo("corrupt tip index".to_string())
                })?);
                self.get_by_index(index)
            }
            None => Ok(None),
        }
    }

    pub fn get_by_index(&self, index: u64) -> Result<Option<Block>, ChainStoreError> {
        match self.kv.get(&block_key(index))? {
            Some(bytes) => Ok(Some(decode_block(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn get_by_hash(&self, hash: &Hash32) -> Result<Option<Block>, ChainStoreError> {
        match self.kv.get(&hash_index_key(hash))? {
            Some(bytes) => {
                let index = u64::from_le_bytes(bytes.try_into().map_err(|_| {
                    ChainStoreError::StorageIo("corrupt hash index entry".to_string())
                })?);
                self.get_by_index(index)
            }
            None => Ok(None),
        }
    }

    /// Blocks `[start, start + limit)`, in ascending index order. Stops
    /// early at the current tip.
    pub fn range(&self, start: u64, limit: usize) -> Result<Vec<Block>, ChainStoreError> {
        let mut blocks = Vec::with_capacity(limit);
        for index in start..start.saturating_add(limit as u64) {
            match self.get_by_index(index)? {
                Some(block) => blocks.push(block),
                None => break,
            }
        }
        Ok(blocks)
    }
}
