//! Durable hand-off between HTTP ingestion and the consensus tick loop.
//!
//! Events are deduplicated by `event_id` and never overwritten once stored;
//! only their `status` is rewritten, by `mark_processed`.

use crate::domain::entities::{EnqueueOutcome, EventSource, PendingEvent, QueuedEvent};
use crate::domain::errors::IngestQueueError;
use crate::ports::outbound::KeyValueStore;
use cw_types::{BlockEvent, EventStatus};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const EVENT_PREFIX: &[u8] = b"event:";

fn event_key(event_id: &str) -> Vec<u8> {
    let mut key = EVENT_PREFIX.to_vec();
    key.extend_from_slice(event_id.as_bytes());
    key
}

fn encode(record: &QueuedEvent) -> Result<Vec<u8>, IngestQueueError> {
    serde_json::to_vec(record).map_err(|e| IngestQueueError::StorageIo(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<QueuedEvent, IngestQueueError> {
    serde_json::from_slice(bytes).map_err(|e| IngestQueueError::StorageIo(e.to_string()))
}

pub struct IngestQueueService<KV: KeyValueStore> {
    kv: Arc<KV>,
    next_sequence: AtomicU64,
}

impl<KV: KeyValueStore> IngestQueueService<KV> {
    /// Build a service over `kv`, recovering the sequence counter from any
    /// events already present (so a restart does not reuse sequence numbers).
    pub fn new(kv: Arc<KV>) -> Result<Self, IngestQueueError> {
        let mut max_seen = 0u64;
        for (_, value) in kv.prefix_scan(EVENT_PREFIX)? {
            let record = decode(&value)?;
            max_seen = max_seen.max(record.sequence + 1);
        }
        Ok(Self {
            kv,
            next_sequence: AtomicU64::new(max_seen),
        })
    }

    /// Enqueue a freshly-submitted, as-yet-unverified event (spec section
    /// 6.2's ingest endpoint path). `raw` is the exact JSON object the
    /// submitter signed; consensus re-validates against it rather than a
    /// re-encoding of `event`, so an integer-valued number or a lowercase
    /// enum string the submitter actually signed over still verifies at
    /// commit time.
    pub fn enqueue(&self, event: BlockEvent, raw: serde_json::Value) -> Result<EnqueueOutcome, IngestQueueError> {
        self.enqueue_with_source(event, raw, EventSource::Submitted)
    }

    /// Enqueue a block learned from a peer's already-committed chain (spec
    /// section 4.5). The Consensus Engine skips signature re-verification
    /// for these and only re-checks chain linkage, so there is no signed
    /// payload to preserve; `raw` is just a re-encoding of `event`.
    pub fn enqueue_gossip(&self, event: BlockEvent) -> Result<EnqueueOutcome, IngestQueueError> {
        let raw = serde_json::to_value(&event).map_err(|e| IngestQueueError::StorageIo(e.to_string()))?;
        self.enqueue_with_source(event, raw, EventSource::Gossip)
    }

    fn enqueue_with_source(
        &self,
        event: BlockEvent,
        raw: serde_json::Value,
        source: EventSource,
    ) -> Result<EnqueueOutcome, IngestQueueError> {
        let key = event_key(&event.event_id);
        if self.kv.get(&key)?.is_some() {
            return Ok(EnqueueOutcome::Duplicate);
        }
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let record = QueuedEvent {
            event,
            raw,
            status: EventStatus::Pending,
            sequence,
            source,
        };
        self.kv.put(&key, &encode(&record)?)?;
        Ok(EnqueueOutcome::Accepted)
    }

    /// Events still pending, ordered by arrival sequence ascending.
    pub fn iter_unprocessed(&self) -> Result<Vec<PendingEvent>, IngestQueueError> {
        let mut records = self
            .kv
            .prefix_scan(EVENT_PREFIX)?
            .into_iter()
            .map(|(_, value)| decode(&value))
            .collect::<Result<Vec<_>, _>>()?;
        records.retain(|r| matches!(r.status, EventStatus::Pending));
        records.sort_by_key(|r| r.sequence);
        Ok(records
            .into_iter()
            .map(|r| PendingEvent { event: r.event, raw: r.raw, source: r.source })
            .collect())
    }

    /// Record the terminal status of an event. Idempotent: calling this
    /// again with the same or a different terminal status simply overwrites
    /// the stored status.
    pub fn mark_processed(&self, event_id: &str, status: EventStatus) -> Result<(), IngestQueueError> {
        let key = event_key(event_id);
        let mut record = match self.kv.get(&key)? {
            Some(bytes) => decode(&bytes)?,
            None => return Err(IngestQueueError::NotFound(event_id.to_string())),
        };
        record.status = status;
        self.kv.put(&key, &encode(&record)?)?;
        Ok(())
    }

    pub fn status_of(&self, event_id: &str) -> Result<Option<EventStatus>, IngestQueueError> {
        match self.kv.get(&event_key(event_id))? {
            Some(bytes) => Ok(Some(decode(&bytes)?.status)),
            None => Ok(None),
        }
    }
}
