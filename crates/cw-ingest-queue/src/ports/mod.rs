pub mod outbound;

pub use outbound::{InMemoryKv, KeyValueStore};
