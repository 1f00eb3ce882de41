//! Driven port: the outbound side of the gossip wire protocol. Generic so
//! tests substitute an in-memory transport instead of real sockets.

use crate::domain::{GossipError, TipAnnouncement};
use async_trait::async_trait;
use cw_types::Block;

#[async_trait]
pub trait GossipTransport: Send + Sync {
    /// Push this node's tip announcement to `peer_address`.
    async fn announce(&self, peer_address: &str, announcement: TipAnnouncement) -> Result<(), GossipError>;

    /// Pull `peer_address`'s current tip.
    async fn fetch_tip(&self, peer_address: &str) -> Result<TipAnnouncement, GossipError>;

    /// Pull the committed block at `index` from `peer_address`, if it has one.
    async fn fetch_block(&self, peer_address: &str, index: u64) -> Result<Option<Block>, GossipError>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// An in-process transport backed by a fixed set of peer chains, for
    /// tests that exercise the listen/broadcast loops without sockets.
    #[derive(Default)]
    pub struct InMemoryTransport {
        tips: Mutex<HashMap<String, TipAnnouncement>>,
        blocks: Mutex<HashMap<String, HashMap<u64, Block>>>,
        unreachable: Mutex<std::collections::HashSet<String>>,
    }

    impl InMemoryTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed_peer(&self, peer_address: &str, tip: TipAnnouncement, blocks: Vec<Block>) {
            self.tips.lock().insert(peer_address.to_string(), tip);
            let by_index = blocks.into_iter().map(|b| (b.index, b)).collect();
            self.blocks.lock().insert(peer_address.to_string(), by_index);
        }

        pub fn mark_unreachable(&self, peer_address: &str) {
            self.unreachable.lock().insert(peer_address.to_string());
        }
    }

    #[async_trait]
    impl GossipTransport for InMemoryTransport {
        async fn announce(&self, peer_address: &str, _announcement: TipAnnouncement) -> Result<(), GossipError> {
            if self.unreachable.lock().contains(peer_address) {
                return Err(GossipError::PeerUnreachable {
                    peer: peer_address.to_string(),
                    detail: "simulated".to_string(),
                });
            }
            Ok(())
        }

        async fn fetch_tip(&self, peer_address: &str) -> Result<TipAnnouncement, GossipError> {
            if self.unreachable.lock().contains(peer_address) {
                return Err(GossipError::PeerUnreachable {
                    peer: peer_address.to_string(),
                    detail: "simulated".to_string(),
                });
            }
            self.tips
                .lock()
                .get(peer_address)
                .copied()
                .ok_or_else(|| GossipError::PeerUnreachable {
                    peer: peer_address.to_string(),
                    detail: "unknown peer".to_string(),
                })
        }

        async fn fetch_block(&self, peer_address: &str, index: u64) -> Result<Option<Block>, GossipError> {
            if self.unreachable.lock().contains(peer_address) {
                return Err(GossipError::PeerUnreachable {
                    peer: peer_address.to_string(),
                    detail: "simulated".to_string(),
                });
            }
            Ok(self
                .blocks
                .lock()
                .get(peer_address)
                .and_then(|blocks| blocks.get(&index))
                .cloned())
        }
    }
}
