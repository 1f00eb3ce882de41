pub mod entities;
pub mod errors;

pub use entities::{EnqueueOutcome, EventSource, PendingEvent, QueuedEvent};
pub use errors::IngestQueueError;
