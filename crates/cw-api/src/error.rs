//! The flat `{status:"error", error:<kind>, message:<human>}` body every
//! handler error collapses to (spec section 7). Internal error enums are
//! never serialized directly; each gets a `From` impl here instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
    message: String,
}

pub struct ApiError {
    status: StatusCode,
    kind: String,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, kind = %self.kind, message = %self.message, "request rejected");
        (
            self.status,
            Json(ErrorBody {
                status: "error",
                error: self.kind,
                message: self.message,
            }),
        )
            .into_response()
    }
}

/// Validation failures surface their own granular kind (`BadHex`,
/// `MissingField`, ...) rather than the coarser `MalformedEvent`, matching
/// the caller-visible vocabulary the validator already defines.
impl From<cw_validator::ValidationError> for ApiError {
    fn from(e: cw_validator::ValidationError) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, e.kind_str(), e.to_string())
    }
}

impl From<cw_chain_store::ChainStoreError> for ApiError {
    fn from(e: cw_chain_store::ChainStoreError) -> Self {
        let status = match &e {
            cw_chain_store::ChainStoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, e.error_kind(), e.to_string())
    }
}

impl From<cw_ingest_queue::IngestQueueError> for ApiError {
    fn from(e: cw_ingest_queue::IngestQueueError) -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "StorageIO", e.to_string())
    }
}
