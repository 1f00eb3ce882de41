//! # Event Bus
//!
//! A single in-process broadcast channel connecting the Consensus Engine,
//! Gossip Protocol, and Equilibrium Controller tasks.

pub mod bus;
pub mod events;

pub use bus::{EventBus, DEFAULT_CHANNEL_CAPACITY};
pub use events::NodeEvent;
