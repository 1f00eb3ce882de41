pub mod errors;

pub use errors::ChainStoreError;
