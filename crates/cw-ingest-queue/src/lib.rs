//! # Ingest Queue
//!
//! The durable, deduplicated hand-off between HTTP ingestion and the
//! consensus tick loop. Events are written once under their `event_id`
//! and never overwritten; only their `status` is rewritten, by
//! `mark_processed`, once consensus has decided their fate.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{EnqueueOutcome, EventSource, IngestQueueError, PendingEvent, QueuedEvent};
pub use ports::{InMemoryKv, KeyValueStore};
pub use service::IngestQueueService;
