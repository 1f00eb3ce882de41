//! The handler-visible application state (spec section 4.7).

use crate::ports::{ChainStoreReader, IngestQueueProducer, PeerSource};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Rewards are a read-only derived view over the Chain Store, not a
/// separate ledger (spec section 6.2's ambient resolution), so there is no
/// `RewardLedger` field here; `handlers::rewards` scans `chain` directly.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn ChainStoreReader>,
    pub queue: Arc<dyn IngestQueueProducer>,
    pub peers: Arc<dyn PeerSource>,
    /// Set by the Consensus Engine on a fatal halt; observed by `/health`.
    pub halted: Arc<AtomicBool>,
    pub default_list_limit: usize,
    pub max_list_limit: usize,
}

impl AppState {
    pub fn new(
        chain: Arc<dyn ChainStoreReader>,
        queue: Arc<dyn IngestQueueProducer>,
        peers: Arc<dyn PeerSource>,
        halted: Arc<AtomicBool>,
    ) -> Self {
        Self {
            chain,
            queue,
            peers,
            halted,
            default_list_limit: 50,
            max_list_limit: 1000,
        }
    }
}
