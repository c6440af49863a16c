//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Validation` get dedicated variants because callers
//! routinely distinguish "the resource does not exist" and "the server
//! rejected my fields" from transport-level surprises. All other non-2xx
//! responses land in `Http` with the raw status code and body for
//! debugging.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 — the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 422 with per-field validation messages.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(BTreeMap<String, Vec<String>>),

    /// The server returned a non-2xx status other than 404 or 422.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
