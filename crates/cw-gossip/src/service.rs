//! The three gossip loops (spec section 4.5): broadcast this node's tip,
//! listen for peers' tips and close any gap by catch-up fetch, and
//! periodically evict stale peers.
//!
//! Gossip never writes to the chain store directly: every peer-supplied
//! block is converted into a synthetic [`BlockEvent`] and handed to the
//! Ingest Queue, so it is re-checked by the Consensus Engine's ordinary
//! tip-extension path (spec section 4.4.5) exactly like a submitted one.

use crate::config::GossipConfig;
use crate::domain::TipAnnouncement;
use crate::peer_table::PeerTable;
use crate::ports::outbound::GossipTransport;
use cw_bus::{EventBus, NodeEvent};
use cw_chain_store::{ChainStoreService, KeyValueStore as ChainKv};
use cw_equilibrium::{IntervalCell, RateCounters, LISTEN_DEPHASE_FACTOR};
use cw_ingest_queue::{IngestQueueService, KeyValueStore as QueueKv};
use cw_types::{BlockEvent, Hash32, PeerTip, PubKey32, Sig64};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

pub struct GossipService<T: GossipTransport, CKV: ChainKv, QKV: QueueKv> {
    chain: Arc<ChainStoreService<CKV>>,
    queue: Arc<IngestQueueService<QKV>>,
    transport: T,
    table: Mutex<PeerTable>,
    bus: Arc<EventBus>,
    rate: Arc<RateCounters>,
    interval: Arc<IntervalCell>,
    config: GossipConfig,
}

impl<T: GossipTransport, CKV: ChainKv, QKV: QueueKv> GossipService<T, CKV, QKV> {
    pub fn new(
        chain: Arc<ChainStoreService<CKV>>,
        queue: Arc<IngestQueueService<QKV>>,
        transport: T,
        bus: Arc<EventBus>,
        rate: Arc<RateCounters>,
        interval: Arc<IntervalCell>,
        config: GossipConfig,
    ) -> Self {
        let mut table = PeerTable::new(config.max_peers);
        table.seed_bootstrap(&config.bootstrap_peers, now_secs());
        Self {
            chain,
            queue,
            transport,
            table: Mutex::new(table),
            bus,
            rate,
            interval,
            config,
        }
    }

    pub fn peer_snapshot(&self) -> Vec<PeerTip> {
        self.table.lock().snapshot()
    }

    pub fn peer_count(&self) -> usize {
        self.table.lock().len()
    }

    /// Record an unsolicited announcement received over the HTTP surface
    /// (`POST /v1/gossip/announce`), the same bookkeeping `listen_once`
    /// performs for a polled tip.
    pub fn record_announcement(&self, peer_address: &str, tip_index: u64, tip_hash: Hash32) {
        let now = now_secs();
        self.table.lock().upsert_tip(peer_address, tip_index, tip_hash, now, 0.0);
        self.bus.publish(NodeEvent::PeerAnnounced {
            peer_address: peer_address.to_string(),
            tip_index,
            tip_hash,
        });
    }

    /// Announce the current tip to every healthy peer. Returns how many
    /// accepted the announcement.
    pub async fn broadcast_once(&self) -> usize {
        let tip = match self.chain.tip() {
            Ok(Some(tip)) => tip,
            _ => return 0,
        };
        let announcement = TipAnnouncement {
            tip_index: tip.index,
            tip_hash: tip.block_hash,
            timestamp: now_secs(),
        };
        let peers = self.table.lock().healthy_peers(now_secs());

        let mut delivered = 0;
        for peer in peers {
            match self.transport.announce(&peer.peer_address, announcement).await {
                Ok(()) => {
                    self.table.lock().record_success(&peer.peer_address, now_secs());
                    self.rate.record_announcement();
                    delivered += 1;
                }
                Err(e) => {
                    tracing::warn!(peer = %peer.peer_address, error = %e, "gossip announce failed");
                    self.table.lock().record_failure(&peer.peer_address, now_secs());
                }
            }
        }
        delivered
    }

    /// Poll every healthy peer's tip and close any gap within the fetch
    /// window. Returns how many peers contributed at least one new block.
    pub async fn listen_once(&self) -> usize {
        let tip = match self.chain.tip() {
            Ok(Some(tip)) => tip,
            _ => return 0,
        };
        let peers = self.table.lock().healthy_peers(now_secs());

        let mut integrated = 0;
        for peer in peers {
            let remote_tip = match self.transport.fetch_tip(&peer.peer_address).await {
                Ok(remote_tip) => remote_tip,
                Err(e) => {
                    tracing::warn!(peer = %peer.peer_address, error = %e, "gossip fetch_tip failed");
                    self.table.lock().record_failure(&peer.peer_address, now_secs());
                    continue;
                }
            };
            self.table.lock().upsert_tip(
                &peer.peer_address,
                remote_tip.tip_index,
                remote_tip.tip_hash,
                now_secs(),
                0.0,
            );
            self.table.lock().record_success(&peer.peer_address, now_secs());
            self.rate.record_integration();
            self.bus.publish(NodeEvent::PeerAnnounced {
                peer_address: peer.peer_address.clone(),
                tip_index: remote_tip.tip_index,
                tip_hash: remote_tip.tip_hash,
            });

            if remote_tip.tip_index <= tip.index {
                continue;
            }

            if self.catch_up(&peer.peer_address, tip.index, tip.block_hash, remote_tip.tip_index).await {
                self.table.lock().mark_supplied_block(&peer.peer_address);
                integrated += 1;
            }
        }
        integrated
    }

    /// Fetch `(local_index, local_index+fetch_window]` from `peer_address`,
    /// stopping at the first block that does not chain onto what came
    /// before (spec section 4.5: incompatible chains are ignored, not an
    /// error). Returns whether any block was enqueued.
    async fn catch_up(&self, peer_address: &str, local_index: u64, local_hash: Hash32, remote_index: u64) -> bool {
        let upper = remote_index.min(local_index + self.config.fetch_window);
        let mut expected_prev_hash = local_hash;
        let mut enqueued_any = false;

        for index in (local_index + 1)..=upper {
            let block = match self.transport.fetch_block(peer_address, index).await {
                Ok(Some(block)) => block,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(peer = %peer_address, error = %e, "gossip fetch_block failed");
                    self.table.lock().record_failure(peer_address, now_secs());
                    break;
                }
            };
            if block.previous_hash != expected_prev_hash {
                tracing::debug!(peer = %peer_address, index, "peer chain does not link to local tip, stopping catch-up");
                break;
            }

            let event = BlockEvent {
                event_id: format!("gossip:{}", block.block_hash.to_hex()),
                block_index: block.index,
                block_hash: block.block_hash,
                cid: block.offchain_cid.clone(),
                miner_address: block.miner_address.clone(),
                capacity: block.capacity,
                work_score: block.work_score,
                ts: block.timestamp,
                signature: Sig64::zero(),
                public_key: PubKey32::zero(),
            };
            expected_prev_hash = block.block_hash;
            match self.queue.enqueue_gossip(event) {
                Ok(_) => enqueued_any = true,
                Err(e) => tracing::warn!(error = %e, "ingest queue unavailable for gossip block"),
            }
        }
        enqueued_any
    }

    pub fn cleanup_once(&self) {
        let now = now_secs();
        let mut table = self.table.lock();
        table.evict_stale(now, self.config.peer_stale_ttl.as_secs_f64());
        table.prune_to_cap();
    }

    pub async fn run_broadcast(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        loop {
            let sleep = tokio::time::sleep(Duration::from_secs_f64(self.interval.get()));
            tokio::select! {
                _ = sleep => {
                    self.broadcast_once().await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }

    pub async fn run_listen(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        loop {
            let listen_secs = self.interval.get() * LISTEN_DEPHASE_FACTOR;
            let sleep = tokio::time::sleep(Duration::from_secs_f64(listen_secs));
            tokio::select! {
                _ = sleep => {
                    self.listen_once().await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }

    pub async fn run_cleanup(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.config.peer_cleanup_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.cleanup_once();
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }
}
