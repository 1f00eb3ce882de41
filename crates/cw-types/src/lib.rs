//! # Shared Types
//!
//! Entities and wire-format primitives shared by every subsystem of the
//! computational-work node: committed `Block`s, candidate `BlockEvent`s,
//! the gossip `PeerTip`, the `GenesisAnchor`, and the hex-string newtypes
//! the wire format (all hashes/keys lowercase hex) is built from.

pub mod capacity;
pub mod entities;
pub mod error_kind;
pub mod hex_bytes;
pub mod outcome;

pub use capacity::Capacity;
pub use entities::{Block, BlockEvent, EventStatus, GenesisAnchor, PeerTip};
pub use error_kind::NodeErrorKind;
pub use hex_bytes::{Hash32, HexFieldError, PubKey32, Sig64};
pub use outcome::EventOutcome;
