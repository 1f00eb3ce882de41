//! Core entities shared across the node: committed blocks, candidate
//! events, peer tips, and the genesis anchor.

use crate::capacity::Capacity;
use crate::hex_bytes::Hash32;
use serde::{Deserialize, Serialize};

/// A committed, immutable chain entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub block_hash: Hash32,
    pub previous_hash: Hash32,
    pub timestamp: f64,
    pub miner_address: String,
    pub work_score: f64,
    pub cumulative_work_score: f64,
    pub capacity: Capacity,
    #[serde(default)]
    pub offchain_cid: String,
    pub merkle_root: Hash32,
}

impl Block {
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

/// A candidate block event, as submitted by a miner or relayed by gossip,
/// not yet validated or committed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockEvent {
    pub event_id: String,
    pub block_index: u64,
    pub block_hash: Hash32,
    #[serde(default)]
    pub cid: String,
    pub miner_address: String,
    pub capacity: Capacity,
    pub work_score: f64,
    pub ts: f64,
    pub signature: crate::hex_bytes::Sig64,
    pub public_key: crate::hex_bytes::PubKey32,
}

/// Processing status of a queued event, recorded by `mark_processed`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    Committed { block_index: u64 },
    Rejected { reason: String },
}

/// One entry in the gossip peer table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeerTip {
    pub peer_address: String,
    pub tip_index: u64,
    pub tip_hash: Hash32,
    pub last_seen: f64,
    pub rtt_estimate: f64,
}

/// The fixed genesis block every node on the network must agree on.
#[derive(Clone, Debug, PartialEq)]
pub struct GenesisAnchor {
    pub hash: Hash32,
    pub timestamp: f64,
}

impl GenesisAnchor {
    pub const MINER_ADDRESS: &'static str = "GENESIS";

    /// Materialize the anchor as the index-0 `Block` every chain store starts from.
    pub fn block(&self) -> Block {
        Block {
            index: 0,
            block_hash: self.hash,
            previous_hash: Hash32::zero(),
            timestamp: self.timestamp,
            miner_address: Self::MINER_ADDRESS.to_string(),
            work_score: 0.0,
            cumulative_work_score: 0.0,
            capacity: Capacity::Server,
            offchain_cid: String::new(),
            merkle_root: Hash32::zero(),
        }
    }

    /// Does `block` match this anchor bit-for-bit (invariant I3)?
    pub fn matches(&self, block: &Block) -> bool {
        *block == self.block()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_block_matches_its_own_anchor() {
        let anchor = GenesisAnchor {
            hash: Hash32([0x11; 32]),
            timestamp: 1_700_000_000.0,
        };
        assert!(anchor.matches(&anchor.block()));
    }

    #[test]
    fn genesis_block_has_zero_previous_hash_and_weight() {
        let anchor = GenesisAnchor {
            hash: Hash32([0xAA; 32]),
            timestamp: 0.0,
        };
        let block = anchor.block();
        assert!(block.previous_hash.is_zero());
        assert_eq!(block.work_score, 0.0);
        assert_eq!(block.cumulative_work_score, 0.0);
        assert_eq!(block.miner_address, "GENESIS");
    }

    #[test]
    fn block_event_round_trips_through_json() {
        let event = BlockEvent {
            event_id: "e-1".to_string(),
            block_index: 1,
            block_hash: Hash32([0xAA; 32]),
            cid: String::new(),
            miner_address: "miner-1".to_string(),
            capacity: Capacity::Mobile,
            work_score: 1.0,
            ts: 1_700_000_000.0,
            signature: crate::hex_bytes::Sig64([0u8; 64]),
            public_key: crate::hex_bytes::PubKey32([0u8; 32]),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: BlockEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
