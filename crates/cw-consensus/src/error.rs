//! Consensus-level errors.
//!
//! Only [`ConsensusError::Fatal`] halts the engine (spec section 4.4.5);
//! everything else is local to one event or one tick and the loop
//! continues.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsensusError {
    /// A chain-store write threatened I1-I4: the engine must halt.
    #[error("fatal chain store error, halting consensus: {0}")]
    Fatal(#[from] cw_chain_store::ChainStoreError),

    /// The ingest queue could not be drained this tick; retried next tick.
    #[error("ingest queue error, retrying next tick: {0}")]
    QueueUnavailable(#[from] cw_ingest_queue::IngestQueueError),
}
