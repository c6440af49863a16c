//! Request-level errors and their HTTP mapping.
//!
//! # Design
//! Three kinds cover the whole API: validation failures (422, detected
//! before any write), unknown identifiers (404), and persistence failures
//! (500, opaque to the client). Handlers return `Result<_, ApiError>` and
//! the `IntoResponse` impl renders the envelope, so the status mapping
//! lives in exactly one place.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::response::Envelope;

/// Field name → human-readable messages, as produced by validation.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors a handler can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload failed validation; nothing was written.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// No todo exists with the requested id.
    #[error("todo not found")]
    NotFound,

    /// The persistence layer failed. The in-memory store never produces
    /// this; it exists for the contract with future backends.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(Envelope::validation(errors))).into_response()
            }
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(Envelope::error("Todo not found"))).into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!("store failure: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(Envelope::error("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}
