//! Gossip's internal view of a peer: the public [`cw_types::PeerTip`] plus
//! the health/backoff bookkeeping no other subsystem needs to see.

use cw_types::{Hash32, PeerTip};

/// A peer's announced tip, as exchanged over the wire (spec section 4.5).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TipAnnouncement {
    pub tip_index: u64,
    pub tip_hash: Hash32,
    pub timestamp: f64,
}

/// One row of the peer table: the public tip plus local-only health state.
/// Lives in a `Vec`, addressed by the table's address index, never by a
/// back-pointer from the health state itself.
#[derive(Clone, Debug)]
pub struct PeerRow {
    pub tip: PeerTip,
    pub health_score: f64,
    pub consecutive_failures: u32,
    pub backoff_until: Option<f64>,
    pub supplied_block: bool,
}

impl PeerRow {
    pub fn new(peer_address: String, now: f64) -> Self {
        Self {
            tip: PeerTip {
                peer_address,
                tip_index: 0,
                tip_hash: Hash32::zero(),
                last_seen: now,
                rtt_estimate: 0.0,
            },
            health_score: 1.0,
            consecutive_failures: 0,
            backoff_until: None,
            supplied_block: false,
        }
    }

    pub fn is_suspended(&self, now: f64) -> bool {
        self.backoff_until.map(|until| now < until).unwrap_or(false)
    }
}
