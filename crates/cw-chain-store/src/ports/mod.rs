pub mod outbound;

pub use outbound::{BatchOperation, InMemoryKv, KeyValueStore};
