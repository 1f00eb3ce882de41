use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainStoreError {
    #[error("block index {index} already occupied")]
    IndexOccupied { index: u64 },

    #[error("block {index} does not link to the current tip: expected previous_hash {expected}, got {actual}")]
    BrokenLink {
        index: u64,
        expected: String,
        actual: String,
    },

    #[error("genesis block does not match the fixed genesis anchor")]
    GenesisViolation,

    #[error("no block at index {index}")]
    NotFound { index: u64 },

    #[error("storage I/O error: {0}")]
    StorageIo(String),
}

impl ChainStoreError {
    /// The stable HTTP-facing `NodeErrorKind` name this error maps to.
    pub fn error_kind(&self) -> &'static str {
        match self {
            ChainStoreError::IndexOccupied { .. } => "StaleTipConflict",
            ChainStoreError::BrokenLink { .. } => "BrokenLink",
            ChainStoreError::GenesisViolation => "GenesisMismatch",
            ChainStoreError::NotFound { .. } => "StorageIO",
            ChainStoreError::StorageIo(_) => "StorageIO",
        }
    }
}
