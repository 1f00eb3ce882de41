use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestQueueError {
    #[error("storage I/O error: {0}")]
    StorageIo(String),

    #[error("no event with id {0}")]
    NotFound(String),
}
