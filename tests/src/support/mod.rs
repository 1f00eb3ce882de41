//! Shared test fixtures: an in-memory node harness wired the same way
//! `cw_node::context::build` wires the real one, plus the signing helper
//! every scenario uses to produce a well-formed ingest payload.

use cw_api::{AppState, PeerSource};
use cw_bus::EventBus;
use cw_chain_store::{ChainStoreService, InMemoryKv as ChainMemKv};
use cw_consensus::{ConsensusConfig, ConsensusEngine};
use cw_ingest_queue::{InMemoryKv as QueueMemKv, IngestQueueService};
use cw_types::{GenesisAnchor, Hash32, PeerTip};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// A fixed genesis hash every scenario below commits against.
pub const GENESIS_HASH_HEX: &str = "d1700c2681b75c1d22ed08285994c202d310ff25cf40851365ca6fea22011358";

pub fn genesis() -> GenesisAnchor {
    GenesisAnchor {
        hash: Hash32::from_hex(GENESIS_HASH_HEX).expect("fixture hash is well-formed hex"),
        timestamp: 1_700_000_000.0,
    }
}

/// A gossip-free peer source for scenarios that only need the HTTP
/// surface and the consensus tick, not the gossip protocol itself.
#[derive(Default)]
pub struct NoPeers;

impl PeerSource for NoPeers {
    fn peer_snapshot(&self) -> Vec<PeerTip> {
        Vec::new()
    }

    fn peer_count(&self) -> usize {
        0
    }

    fn record_announcement(&self, _peer_address: &str, _tip_index: u64, _tip_hash: Hash32) {}
}

/// One in-memory node: the Chain Store, Ingest Queue, and Consensus Engine
/// wired together exactly as `cw_node::context::build` wires the real
/// RocksDB-backed ones, minus gossip and the HTTP listener.
pub struct Node {
    pub chain: Arc<ChainStoreService<ChainMemKv>>,
    pub queue: Arc<IngestQueueService<QueueMemKv>>,
    pub bus: Arc<EventBus>,
    pub consensus: Arc<ConsensusEngine<ChainMemKv, QueueMemKv>>,
}

impl Node {
    pub fn new(genesis: GenesisAnchor) -> Self {
        let chain = Arc::new(ChainStoreService::new(Arc::new(ChainMemKv::new()), genesis));
        let queue = Arc::new(IngestQueueService::new(Arc::new(QueueMemKv::new())).expect("empty queue recovers cleanly"));
        let bus = Arc::new(EventBus::new());
        let consensus = Arc::new(ConsensusEngine::new(chain.clone(), queue.clone(), bus.clone(), ConsensusConfig::default()));
        Self { chain, queue, bus, consensus }
    }

    /// Run one consensus tick, draining whatever the queue holds.
    pub fn tick(&self) -> usize {
        self.consensus.tick_once().expect("tick_once does not fail on a healthy store")
    }

    /// Build the HTTP surface over this node's chain store and queue, with
    /// no peers (`NoPeers`) since these scenarios don't exercise gossip.
    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.chain.clone() as Arc<dyn cw_api::ChainStoreReader>,
            self.queue.clone() as Arc<dyn cw_api::IngestQueueProducer>,
            Arc::new(NoPeers) as Arc<dyn PeerSource>,
            Arc::new(AtomicBool::new(false)),
        )
    }

    pub fn router(&self) -> axum::Router {
        cw_api::build_router(self.app_state())
    }
}

/// Build a well-formed, signed ingest payload: the JSON body an HTTP
/// client would POST to `/v1/ingest/block`. `block_index` is set to an
/// obviously-wrong value on purpose, since the engine always rebinds it to
/// `tip.index + 1` (eta-damping) regardless of what the submitter claims.
pub fn signed_ingest_body(
    kp: &cw_crypto::Ed25519KeyPair,
    event_id: &str,
    block_hash: Hash32,
    miner_address: &str,
    work_score: f64,
) -> serde_json::Value {
    let mut fields = serde_json::Map::new();
    fields.insert("event_id".into(), serde_json::json!(event_id));
    fields.insert("block_index".into(), serde_json::json!(9_999));
    fields.insert("block_hash".into(), serde_json::json!(block_hash.to_hex()));
    fields.insert("cid".into(), serde_json::json!(""));
    fields.insert("miner_address".into(), serde_json::json!(miner_address));
    fields.insert("capacity".into(), serde_json::json!("MOBILE"));
    fields.insert("work_score".into(), serde_json::json!(work_score));
    fields.insert("ts".into(), serde_json::json!(1_700_000_001.0));
    let unsigned = serde_json::Value::Object(fields.clone());
    let signing_bytes = cw_crypto::canonicalize_event(&unsigned).expect("fixture payload canonicalizes");
    let sig = kp.sign(&signing_bytes);
    fields.insert("signature".into(), serde_json::json!(sig.to_hex()));
    fields.insert("public_key".into(), serde_json::json!(kp.public_key().to_hex()));
    serde_json::Value::Object(fields)
}

/// Same as `signed_ingest_body`, but shaped the way a real client is free
/// to send it rather than the way the other fixtures happen to send it: an
/// integer `work_score`/`ts` instead of a float literal, and a lowercase
/// `capacity` string. `Capacity::from_str` accepts either case and ingest
/// verifies the signature over whatever bytes actually arrived, so this
/// must commit exactly like the uppercase/float form.
pub fn signed_ingest_body_integer_and_lowercase(
    kp: &cw_crypto::Ed25519KeyPair,
    event_id: &str,
    block_hash: Hash32,
    miner_address: &str,
    work_score: u64,
) -> serde_json::Value {
    let mut fields = serde_json::Map::new();
    fields.insert("event_id".into(), serde_json::json!(event_id));
    fields.insert("block_index".into(), serde_json::json!(9_999));
    fields.insert("block_hash".into(), serde_json::json!(block_hash.to_hex()));
    fields.insert("cid".into(), serde_json::json!(""));
    fields.insert("miner_address".into(), serde_json::json!(miner_address));
    fields.insert("capacity".into(), serde_json::json!("mobile"));
    fields.insert("work_score".into(), serde_json::json!(work_score));
    fields.insert("ts".into(), serde_json::json!(1_700_000_001u64));
    let unsigned = serde_json::Value::Object(fields.clone());
    let signing_bytes = cw_crypto::canonicalize_event(&unsigned).expect("fixture payload canonicalizes");
    let sig = kp.sign(&signing_bytes);
    fields.insert("signature".into(), serde_json::json!(sig.to_hex()));
    fields.insert("public_key".into(), serde_json::json!(kp.public_key().to_hex()));
    serde_json::Value::Object(fields)
}
