//! The stable error-kind vocabulary surfaced to HTTP callers (section 7).
//!
//! HTTP callers never see internal error types, only one of these eight
//! stable strings plus a human message. Every crate that can fail in a way
//! visible to callers maps its own error type onto this enum at the
//! boundary rather than leaking crate-specific error variants outward.

use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum NodeErrorKind {
    MalformedEvent,
    DuplicateEvent,
    StaleTipConflict,
    BrokenLink,
    GenesisMismatch,
    PeerUnreachable,
    PeerMalformed,
    StorageIo,
}

impl NodeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeErrorKind::MalformedEvent => "MalformedEvent",
            NodeErrorKind::DuplicateEvent => "DuplicateEvent",
            NodeErrorKind::StaleTipConflict => "StaleTipConflict",
            NodeErrorKind::BrokenLink => "BrokenLink",
            NodeErrorKind::GenesisMismatch => "GenesisMismatch",
            NodeErrorKind::PeerUnreachable => "PeerUnreachable",
            NodeErrorKind::PeerMalformed => "PeerMalformed",
            NodeErrorKind::StorageIo => "StorageIO",
        }
    }

    /// Errors that threaten I1-I4 and must halt the consensus engine.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            NodeErrorKind::BrokenLink | NodeErrorKind::GenesisMismatch | NodeErrorKind::StorageIo
        )
    }
}

impl fmt::Display for NodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
