//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each API operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies. Parse methods unwrap the
//! server's `{success, message, data}` envelope and surface 404 and 422
//! responses as dedicated error variants.

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Envelope, ListTodos, Todo, UpdateTodo, ValidationBody};

/// Synchronous, stateless client for the todo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self, query: &ListTodos) -> Result<HttpRequest, ApiError> {
        let qs = serde_urlencoded::to_string(query).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let path = if qs.is_empty() {
            format!("{}/todos", self.base_url)
        } else {
            format!("{}/todos?{qs}", self.base_url)
        };
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_get_todo(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_update_todo(&self, id: Uuid, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/todos/{id}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete_todo(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_toggle_todo(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}/todos/{id}/toggle", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        let envelope: Envelope<Vec<Todo>> = parse_envelope(response, 200)?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        expect_data(parse_envelope(response, 200)?)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        expect_data(parse_envelope(response, 201)?)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        expect_data(parse_envelope(response, 200)?)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        expect_data(parse_envelope(response, 200)?)
    }

    /// The delete endpoint answers with a confirmation message only.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<String, ApiError> {
        let envelope: Envelope<()> = parse_envelope(response, 200)?;
        Ok(envelope.message.unwrap_or_default())
    }
}

/// Check the status code, then deserialize the response envelope.
fn parse_envelope<T: serde::de::DeserializeOwned>(
    response: HttpResponse,
    expected: u16,
) -> Result<Envelope<T>, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn expect_data<T>(envelope: Envelope<T>) -> Result<T, ApiError> {
    envelope
        .data
        .ok_or_else(|| ApiError::Deserialization("response envelope carries no data".to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        422 => Err(validation_error(&response.body)),
        status => Err(ApiError::Http {
            status,
            body: response.body.clone(),
        }),
    }
}

/// Extract the per-field message map from a 422 body. A body without the
/// expected shape falls back to the raw `Http` variant.
fn validation_error(body: &str) -> ApiError {
    match serde_json::from_str::<ValidationBody>(body) {
        Ok(parsed) => ApiError::Validation(parsed.errors),
        Err(_) => ApiError::Http {
            status: 422,
            body: body.to_string(),
        },
    }
}
