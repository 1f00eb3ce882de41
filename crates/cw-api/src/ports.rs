//! Inbound ports the HTTP surface depends on, each implemented generically
//! for the concrete service types so [`crate::state::AppState`] can hold
//! them as trait objects instead of threading every backend's type
//! parameter through the router (spec section 4.7's `AppState` shape).

use cw_chain_store::{ChainStoreError, ChainStoreService, KeyValueStore as ChainKv};
use cw_gossip::{GossipService, GossipTransport};
use cw_ingest_queue::{EnqueueOutcome, IngestQueueError, IngestQueueService, KeyValueStore as QueueKv};
use cw_types::{Block, BlockEvent, Hash32, PeerTip};

pub trait ChainStoreReader: Send + Sync {
    fn tip(&self) -> Result<Option<Block>, ChainStoreError>;
    fn get_by_index(&self, index: u64) -> Result<Option<Block>, ChainStoreError>;
    fn range(&self, start: u64, limit: usize) -> Result<Vec<Block>, ChainStoreError>;
}

impl<KV: ChainKv> ChainStoreReader for ChainStoreService<KV> {
    fn tip(&self) -> Result<Option<Block>, ChainStoreError> {
        ChainStoreService::tip(self)
    }

    fn get_by_index(&self, index: u64) -> Result<Option<Block>, ChainStoreError> {
        ChainStoreService::get_by_index(self, index)
    }

    fn range(&self, start: u64, limit: usize) -> Result<Vec<Block>, ChainStoreError> {
        ChainStoreService::range(self, start, limit)
    }
}

pub trait IngestQueueProducer: Send + Sync {
    fn enqueue(&self, event: BlockEvent, raw: serde_json::Value) -> Result<EnqueueOutcome, IngestQueueError>;
}

impl<KV: QueueKv> IngestQueueProducer for IngestQueueService<KV> {
    fn enqueue(&self, event: BlockEvent, raw: serde_json::Value) -> Result<EnqueueOutcome, IngestQueueError> {
        IngestQueueService::enqueue(self, event, raw)
    }
}

pub trait PeerSource: Send + Sync {
    fn peer_snapshot(&self) -> Vec<PeerTip>;
    fn peer_count(&self) -> usize;
    fn record_announcement(&self, peer_address: &str, tip_index: u64, tip_hash: Hash32);
}

impl<T: GossipTransport, CKV: ChainKv, QKV: QueueKv> PeerSource for GossipService<T, CKV, QKV> {
    fn peer_snapshot(&self) -> Vec<PeerTip> {
        GossipService::peer_snapshot(self)
    }

    fn peer_count(&self) -> usize {
        GossipService::peer_count(self)
    }

    fn record_announcement(&self, peer_address: &str, tip_index: u64, tip_hash: Hash32) {
        GossipService::record_announcement(self, peer_address, tip_index, tip_hash)
    }
}
