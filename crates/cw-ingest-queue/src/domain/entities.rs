use cw_types::{BlockEvent, EventStatus};
use serde::{Deserialize, Serialize};

/// Where a queued event came from. Submitted events carry an untrusted
/// signature that the Consensus Engine must verify; gossip-fetched events
/// were already committed on a peer's chain, so only the chain-linkage
/// checks of `append` apply to them, not signature re-verification.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Submitted,
    Gossip,
}

/// An event as stored in the queue: the event itself, its current status,
/// an arrival sequence used for ordering instead of wall-clock time (stable
/// under clock skew between submitters), and its source.
///
/// `raw` is the original JSON object the submitter signed (for `Gossip`
/// events, a re-encoding of `event`, since those never carry a trusted
/// signature to re-verify in the first place). Consensus re-validates a
/// `Submitted` event against `raw`, not against `event` re-encoded, so
/// that a signature computed over the submitter's exact bytes — integer
/// literals, lowercase enum strings, whatever they sent — still verifies
/// at commit time instead of being silently altered by a round trip
/// through the typed struct.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueuedEvent {
    pub event: BlockEvent,
    pub raw: serde_json::Value,
    pub status: EventStatus,
    pub sequence: u64,
    pub source: EventSource,
}

/// One still-pending event handed back by `iter_unprocessed`.
#[derive(Clone, Debug)]
pub struct PendingEvent {
    pub event: BlockEvent,
    pub raw: serde_json::Value,
    pub source: EventSource,
}

/// Result of a call to `enqueue`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Accepted,
    Duplicate,
}
