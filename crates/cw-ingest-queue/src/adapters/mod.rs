#[cfg(feature = "rocksdb-backend")]
pub mod rocksdb;
