//! Cross-subsystem integration suite.
//!
//! Each cw-* crate carries its own unit tests against its own ports; this
//! crate wires the real services together the way `cw-node::context` does
//! and drives them end to end: HTTP ingestion through the consensus tick,
//! peer catch-up over gossip, and the durable stores surviving a restart.

pub mod support;

#[cfg(test)]
mod round_trip;
#[cfg(test)]
mod scenarios;
