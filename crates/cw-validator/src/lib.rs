//! # Validator
//!
//! Stateless validation of candidate block events: hex shape, signature,
//! and field-range checks. Never touches the chain store or ingest queue —
//! a rejection here means the event never becomes a candidate at all.

pub mod error;
pub mod validate;

pub use error::ValidationError;
pub use validate::validate_event;
