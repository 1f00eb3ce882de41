use thiserror::Error;

/// The validator's result type is a pure value, never an exception: every
/// rejection reason is one of these variants.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("missing or empty field: {0}")]
    MissingField(&'static str),

    #[error("field {field} is not valid hex")]
    BadHex { field: &'static str },

    #[error("public_key must be 64 hex characters, got {actual}")]
    BadKeyLength { actual: usize },

    #[error("signature must be 128 hex characters, got {actual}")]
    BadSigLength { actual: usize },

    #[error("signature does not verify under the supplied public key")]
    BadSignature,

    #[error("work_score must be greater than zero, got {0}")]
    NonPositiveWork(f64),

    #[error("capacity must be one of MOBILE, DESKTOP, SERVER, got {0:?}")]
    BadCapacity(String),
}

impl ValidationError {
    /// The stable HTTP-facing name for this rejection (distinct from the
    /// human `Display` message).
    pub fn kind_str(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "MissingField",
            ValidationError::BadHex { .. } => "BadHex",
            ValidationError::BadKeyLength { .. } => "BadKeyLength",
            ValidationError::BadSigLength { .. } => "BadSigLength",
            ValidationError::BadSignature => "BadSignature",
            ValidationError::NonPositiveWork(_) => "NonPositiveWork",
            ValidationError::BadCapacity(_) => "BadCapacity",
        }
    }
}
