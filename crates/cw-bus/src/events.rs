//! The node's internal event vocabulary.
//!
//! Three topics connect the three long-running tasks that would otherwise
//! need to poll each other's state: a committed tip wakes the gossip
//! broadcaster, an integrated peer tip feeds the equilibrium controller's
//! damping counter, and a controller adjustment republishes the interval
//! the broadcast loop sleeps on.

use cw_types::Hash32;

#[derive(Clone, Debug, PartialEq)]
pub enum NodeEvent {
    /// The consensus engine extended the chain.
    TipCommitted { index: u64, hash: Hash32 },
    /// A peer's announced tip was accepted and turned into a fetch.
    PeerAnnounced {
        peer_address: String,
        tip_index: u64,
        tip_hash: Hash32,
    },
    /// The equilibrium controller changed the broadcast interval.
    IntervalUpdated { interval_secs: f64 },
}

impl NodeEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            NodeEvent::TipCommitted { .. } => "tip-committed",
            NodeEvent::PeerAnnounced { .. } => "peer-announced",
            NodeEvent::IntervalUpdated { .. } => "interval-updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_names_match_the_three_internal_signals() {
        assert_eq!(
            NodeEvent::TipCommitted {
                index: 1,
                hash: Hash32::zero()
            }
            .topic(),
            "tip-committed"
        );
        assert_eq!(
            NodeEvent::IntervalUpdated { interval_secs: 10.0 }.topic(),
            "interval-updated"
        );
    }
}
