//! The uniform response envelope.
//!
//! Every endpoint answers with `{success, message?, data?}`; validation
//! failures additionally carry `errors`, a field → messages map. Absent
//! fields are omitted from the JSON rather than serialized as null.

use serde::Serialize;

use crate::error::FieldErrors;

/// Response wrapper returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> Envelope<T> {
    /// Success with a payload and no message.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            errors: None,
        }
    }

    /// Success with a confirmation message and a payload.
    pub fn with_message(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
            errors: None,
        }
    }
}

impl Envelope<()> {
    /// Success with a confirmation message and no payload.
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
            errors: None,
        }
    }

    /// Failure with an explanatory message.
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            data: None,
            errors: None,
        }
    }

    /// Failure carrying per-field validation messages.
    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: Some("Validation failed".to_string()),
            data: None,
            errors: Some(errors),
        }
    }
}
