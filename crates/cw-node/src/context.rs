//! Wires every subsystem into one running node.
//!
//! `NodeContext` replaces the module-level globals/singletons the source
//! used (spec section 9): every durable store, service, and shared handle
//! is a field constructed once in [`build`] and threaded explicitly to the
//! tasks that need it, instead of being reached for as ambient state.

use crate::config::NodeConfig;
use anyhow::{bail, Context as _};
use cw_bus::EventBus;
use cw_chain_store::adapters::rocksdb::{self as chain_rocksdb, RocksDbKv as ChainRocksDbKv};
use cw_chain_store::ChainStoreService;
use cw_consensus::ConsensusEngine;
use cw_gossip::{GossipService, ReqwestTransport};
use cw_ingest_queue::adapters::rocksdb::{self as queue_rocksdb, RocksDbKv as QueueRocksDbKv};
use cw_ingest_queue::IngestQueueService;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub type ChainKv = ChainRocksDbKv;
pub type QueueKv = QueueRocksDbKv;
pub type Transport = ReqwestTransport;

/// Every long-lived subsystem handle a running node needs. Held together
/// so `main` can spawn each task off one value rather than threading six
/// separate arguments through.
pub struct NodeContext {
    pub chain: Arc<ChainStoreService<ChainKv>>,
    pub queue: Arc<IngestQueueService<QueueKv>>,
    pub bus: Arc<EventBus>,
    pub consensus: Arc<ConsensusEngine<ChainKv, QueueKv>>,
    pub gossip: Arc<GossipService<Transport, ChainKv, QueueKv>>,
    pub halted: Arc<AtomicBool>,
    pub http: cw_api::HttpConfig,
}

/// Build every subsystem from `config` and perform the startup checks spec
/// section 4.4.5 requires before the engine accepts any events: the
/// genesis block is seeded if the store is empty, and if it is not empty
/// its index-0 block must match the configured anchor bit-for-bit
/// (invariant I3) or the node refuses to start (`GenesisMismatch`, spec
/// section 7).
///
/// Returns the wired context plus the equilibrium controller, kept
/// separate because its `tick` takes `&mut self` and is owned outright by
/// its own task rather than shared behind an `Arc`.
pub fn build(config: &NodeConfig) -> anyhow::Result<(NodeContext, cw_equilibrium::EquilibriumController)> {
    let chain_kv = chain_rocksdb::open_shared(chain_rocksdb::RocksDbConfig {
        path: config.storage.chain_db_path.clone(),
        ..Default::default()
    })
    .context("failed to open chain store")?;
    let chain = Arc::new(ChainStoreService::new(chain_kv, config.genesis.clone()));
    chain.ensure_genesis().context("failed to seed genesis block")?;

    let existing_genesis = chain
        .get_by_index(0)
        .context("failed to read genesis block back")?
        .expect("ensure_genesis guarantees index 0 is present");
    if !config.genesis.matches(&existing_genesis) {
        bail!(
            "GenesisMismatch: stored genesis block does not match the configured GENESIS_HASH; \
             refusing to start (spec section 7)"
        );
    }

    let queue_kv = queue_rocksdb::open_shared(queue_rocksdb::RocksDbConfig {
        path: config.storage.ingest_db_path.clone(),
        ..Default::default()
    })
    .context("failed to open ingest queue")?;
    let queue = Arc::new(IngestQueueService::new(queue_kv).context("failed to recover ingest queue sequence")?);

    let bus = Arc::new(EventBus::new());

    let (equilibrium, rate, interval) = cw_equilibrium::EquilibriumController::new(config.equilibrium.clone());

    let transport = ReqwestTransport::new(config.gossip.peer_request_timeout, config.gossip.self_address.clone());
    let gossip = Arc::new(GossipService::new(
        chain.clone(),
        queue.clone(),
        transport,
        bus.clone(),
        rate,
        interval,
        config.gossip.clone(),
    ));

    let consensus = Arc::new(ConsensusEngine::new(chain.clone(), queue.clone(), bus.clone(), config.consensus));
    let halted = consensus.halted_flag();

    Ok((
        NodeContext {
            chain,
            queue,
            bus,
            consensus,
            gossip,
            halted,
            http: config.http.clone(),
        },
        equilibrium,
    ))
}

impl NodeContext {
    pub fn app_state(&self) -> cw_api::AppState {
        cw_api::AppState::new(
            self.chain.clone() as Arc<dyn cw_api::ChainStoreReader>,
            self.queue.clone() as Arc<dyn cw_api::IngestQueueProducer>,
            self.gossip.clone() as Arc<dyn cw_api::PeerSource>,
            self.halted.clone(),
        )
    }
}

/// Run the equilibrium controller's adjustment tick (spec section 4.6).
/// Owns the controller outright; publishes `IntervalUpdated` so any
/// interested task can observe the new broadcast interval without polling
/// the atomic cell directly.
pub async fn run_equilibrium(
    mut controller: cw_equilibrium::EquilibriumController,
    bus: Arc<EventBus>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut tick = tokio::time::interval(Duration::from_secs_f64(controller.tick_interval()));
    loop {
        tokio::select! {
            _ = tick.tick() => {
                let interval_secs = controller.tick();
                bus.publish(cw_bus::NodeEvent::IntervalUpdated { interval_secs });
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}
