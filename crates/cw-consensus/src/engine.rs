//! The consensus tick loop: the only writer to the chain store.
//!
//! One [`ConsensusEngine`] instance owns the chain store's write path
//! (spec invariant I5). Gossip and the HTTP surface only ever enqueue
//! events for it; they never call `append` themselves.

use crate::config::ConsensusConfig;
use crate::error::ConsensusError;
use cw_bus::{EventBus, NodeEvent};
use cw_chain_store::{ChainStoreError, ChainStoreService, KeyValueStore as ChainKv};
use cw_ingest_queue::{EventSource, IngestQueueService, KeyValueStore as QueueKv};
use cw_types::{Block, BlockEvent, EventStatus, Hash32};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub struct ConsensusEngine<CKV: ChainKv, QKV: QueueKv> {
    chain: Arc<ChainStoreService<CKV>>,
    queue: Arc<IngestQueueService<QKV>>,
    bus: Arc<EventBus>,
    config: ConsensusConfig,
    halted: Arc<AtomicBool>,
}

impl<CKV: ChainKv, QKV: QueueKv> ConsensusEngine<CKV, QKV> {
    pub fn new(
        chain: Arc<ChainStoreService<CKV>>,
        queue: Arc<IngestQueueService<QKV>>,
        bus: Arc<EventBus>,
        config: ConsensusConfig,
    ) -> Self {
        Self {
            chain,
            queue,
            bus,
            config,
            halted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn halted_flag(&self) -> Arc<AtomicBool> {
        self.halted.clone()
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Drain every currently-unprocessed event once, committing what
    /// validates and extending the tip. Returns the number of blocks
    /// committed this tick.
    pub fn tick_once(&self) -> Result<usize, ConsensusError> {
        self.chain.ensure_genesis()?;
        let mut tip = self
            .chain
            .tip()?
            .expect("ensure_genesis guarantees a tip is present");

        let events = self.queue.iter_unprocessed()?;
        let mut committed = 0usize;
        let mut seen_hashes: HashSet<Hash32> = HashSet::new();

        for pending in events {
            let cw_ingest_queue::PendingEvent { event, raw, source } = pending;
            let event_id = event.event_id.clone();

            // Submitted events carry an untrusted signature and must pass
            // the full validator; gossip-fetched events were already
            // committed on a peer's chain, so only the chain-linkage
            // checks below (duplicate hash, tip extension) apply to them.
            //
            // Re-validation runs against `raw` — the exact JSON object the
            // submitter signed — rather than `event` re-encoded through
            // `serde_json::to_value`. The typed `BlockEvent` always writes
            // `work_score`/`ts` as floats and `capacity` in uppercase, so a
            // submitter who signed an integer literal or a lowercase
            // capacity string would otherwise have their signature
            // recomputed over different bytes than they signed and be
            // rejected here as `BadSignature`, even though ingest already
            // verified them correctly.
            let validated: BlockEvent = match source {
                EventSource::Submitted => match cw_validator::validate_event(&raw) {
                    Ok(v) => v,
                    Err(e) => {
                        self.reject(&event_id, e.kind_str().to_string())?;
                        continue;
                    }
                },
                EventSource::Gossip => event,
            };

            let already_committed = self.chain.get_by_hash(&validated.block_hash)?.is_some();
            if already_committed || seen_hashes.contains(&validated.block_hash) {
                self.reject(&event_id, "duplicate_content".to_string())?;
                continue;
            }

            // No merkle data travels on the event payload (spec section
            // 6.3), so the commitment is derived rather than copied: fold
            // the fields the producer did commit to into a real merkle
            // root instead of duplicating block_hash verbatim.
            let merkle_root = cw_crypto::merkle_root(&[
                validated.block_hash,
                cw_crypto::hash(validated.miner_address.as_bytes()),
                cw_crypto::hash(validated.cid.as_bytes()),
            ]);

            // eta-damping (spec section 4.4.2): the submitter's block_index
            // is advisory only; the tip decides the real height.
            let block = Block {
                index: tip.index + 1,
                block_hash: validated.block_hash,
                previous_hash: tip.block_hash,
                timestamp: validated.ts,
                miner_address: validated.miner_address,
                work_score: validated.work_score,
                cumulative_work_score: tip.cumulative_work_score + validated.work_score,
                capacity: validated.capacity,
                offchain_cid: validated.cid,
                merkle_root,
            };

            match self.chain.append(block.clone()) {
                Ok(()) => {
                    self.queue.mark_processed(
                        &event_id,
                        EventStatus::Committed { block_index: block.index },
                    )?;
                    seen_hashes.insert(block.block_hash);
                    tip = block.clone();
                    committed += 1;
                    self.bus.publish(NodeEvent::TipCommitted {
                        index: block.index,
                        hash: block.block_hash,
                    });
                }
                Err(ChainStoreError::IndexOccupied { .. }) => {
                    self.reject(&event_id, "stale_tip".to_string())?;
                }
                Err(fatal) => {
                    self.halted.store(true, Ordering::SeqCst);
                    tracing::error!(error = %fatal, "chain store append failed fatally, halting consensus");
                    return Err(ConsensusError::Fatal(fatal));
                }
            }
        }

        Ok(committed)
    }

    fn reject(&self, event_id: &str, reason: String) -> Result<(), ConsensusError> {
        self.queue
            .mark_processed(event_id, EventStatus::Rejected { reason })?;
        Ok(())
    }

    /// Run the tick loop until `shutdown` flips to `true` or a fatal error
    /// halts the engine. Honors the stop order of spec section 5: this is
    /// the third component to stop, after HTTP ingestion and gossip.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(Duration::from_secs_f64(self.config.tick_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.tick_once() {
                        Ok(0) => {}
                        Ok(n) => tracing::info!(committed = n, "consensus tick committed blocks"),
                        Err(ConsensusError::QueueUnavailable(e)) => {
                            tracing::warn!(error = %e, "ingest queue unavailable this tick, retrying next tick");
                        }
                        Err(ConsensusError::Fatal(_)) => break,
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("consensus engine finishing current tick before shutdown");
                        break;
                    }
                }
            }
        }
    }
}
