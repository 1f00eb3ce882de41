//! The tagged-sum replacement for exception-based event outcomes (section 9).

use crate::hex_bytes::Hash32;

/// The terminal (or pending) state of one ingest-queue event.
#[derive(Clone, Debug, PartialEq)]
pub enum EventOutcome {
    Pending,
    Committed { index: u64, hash: Hash32 },
    Rejected { kind: String, detail: String },
}

impl EventOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EventOutcome::Pending)
    }

    pub fn rejected(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        EventOutcome::Rejected {
            kind: kind.into(),
            detail: detail.into(),
        }
    }
}
