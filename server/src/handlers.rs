//! HTTP handlers: one per API operation.
//!
//! # Design
//! Request bodies are decoded into raw structs with every field optional,
//! then validated at the boundary into the typed commands the store
//! accepts (`NewTodo`, `TodoPatch`). Validation collects every failing
//! field before answering, and runs only after the identifier has been
//! resolved, so an unknown id wins over a bad payload.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::{ApiError, FieldErrors};
use crate::model::{NewTodo, Priority, Todo, TodoFilter, TodoPatch};
use crate::response::Envelope;
use crate::SharedStore;

const TITLE_MAX: usize = 255;

/// Query parameters accepted by the list operation.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    /// Unrecognized `status` values are ignored rather than rejected; the
    /// priority value is passed through verbatim, so an out-of-set value
    /// simply matches nothing.
    fn into_filter(self) -> TodoFilter {
        let mut filter = TodoFilter::default();
        match self.status.as_deref() {
            Some("completed") => filter = filter.completed(),
            Some("pending") => filter = filter.pending(),
            _ => {}
        }
        if let Some(priority) = self.priority {
            filter = filter.by_priority(priority);
        }
        if let Some(search) = self.search {
            filter = filter.search(search);
        }
        filter
    }
}

/// Raw create payload. Fields are optional here so that missing ones
/// surface as per-field validation messages instead of a decode failure.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl CreateTodoRequest {
    fn validate(self) -> Result<NewTodo, ApiError> {
        let mut errors = FieldErrors::new();

        let title = match self.title {
            Some(title) => check_title(title, &mut errors),
            None => {
                field_error(&mut errors, "title", "title is required");
                None
            }
        };
        let priority = match self.priority.as_deref() {
            Some(priority) => check_priority(priority, &mut errors),
            None => {
                field_error(&mut errors, "priority", "priority is required");
                None
            }
        };
        let due_date = self.due_date.as_deref().and_then(|date| check_due_date(date, &mut errors));

        match (title, priority) {
            (Some(title), Some(priority)) if errors.is_empty() => Ok(NewTodo {
                title,
                description: self.description,
                priority,
                due_date,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// Raw update payload. Absence and explicit `null` are different things
/// for the nullable fields, so those are decoded into a nested `Option`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTodoRequest {
    #[serde(deserialize_with = "some_if_present")]
    pub title: Option<Option<String>>,
    #[serde(deserialize_with = "some_if_present")]
    pub description: Option<Option<String>>,
    #[serde(deserialize_with = "some_if_present")]
    pub completed: Option<Option<bool>>,
    #[serde(deserialize_with = "some_if_present")]
    pub priority: Option<Option<String>>,
    #[serde(deserialize_with = "some_if_present")]
    pub due_date: Option<Option<String>>,
}

impl UpdateTodoRequest {
    fn validate(self) -> Result<TodoPatch, ApiError> {
        let mut errors = FieldErrors::new();
        let mut patch = TodoPatch::default();

        match self.title {
            Some(Some(title)) => patch.title = check_title(title, &mut errors),
            Some(None) => field_error(&mut errors, "title", "title must not be empty"),
            None => {}
        }
        if let Some(description) = self.description {
            patch.description = Some(description);
        }
        match self.completed {
            Some(Some(completed)) => patch.completed = Some(completed),
            Some(None) => field_error(&mut errors, "completed", "completed must be a boolean"),
            None => {}
        }
        match self.priority {
            Some(Some(priority)) => patch.priority = check_priority(&priority, &mut errors),
            Some(None) => field_error(&mut errors, "priority", "priority must be one of low, medium, high"),
            None => {}
        }
        match self.due_date {
            Some(Some(date)) => patch.due_date = check_due_date(&date, &mut errors).map(Some),
            Some(None) => patch.due_date = Some(None),
            None => {}
        }

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

/// Maps JSON `null` to `Some(None)` while field absence stays `None` via
/// the struct-level default.
fn some_if_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn field_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors.entry(field.to_string()).or_default().push(message.to_string());
}

fn check_title(title: String, errors: &mut FieldErrors) -> Option<String> {
    if title.is_empty() {
        field_error(errors, "title", "title must not be empty");
        return None;
    }
    if title.chars().count() > TITLE_MAX {
        field_error(errors, "title", "title must be at most 255 characters");
        return None;
    }
    Some(title)
}

fn check_priority(value: &str, errors: &mut FieldErrors) -> Option<Priority> {
    match value.parse() {
        Ok(priority) => Some(priority),
        Err(_) => {
            field_error(errors, "priority", "priority must be one of low, medium, high");
            None
        }
    }
}

fn check_due_date(value: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            field_error(errors, "due_date", "due_date must be a valid date (YYYY-MM-DD)");
            None
        }
    }
}

pub async fn list_todos(
    State(store): State<SharedStore>,
    Query(params): Query<ListParams>,
) -> Json<Envelope<Vec<Todo>>> {
    let todos = store.list(&params.into_filter()).await;
    Json(Envelope::data(todos))
}

pub async fn create_todo(
    State(store): State<SharedStore>,
    Json(input): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Envelope<Todo>>), ApiError> {
    let new = input.validate()?;
    let todo = store.insert(new).await;
    tracing::debug!(id = %todo.id, "todo created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("Todo created successfully", todo)),
    ))
}

pub async fn get_todo(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let todo = store.find(id).await.ok_or(ApiError::NotFound)?;
    Ok(Json(Envelope::data(todo)))
}

pub async fn update_todo(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodoRequest>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    // resolve the identifier first: an unknown id answers 404 even when the
    // payload is also invalid
    if store.find(id).await.is_none() {
        return Err(ApiError::NotFound);
    }
    let patch = input.validate()?;
    let todo = store.update(id, patch).await.ok_or(ApiError::NotFound)?;
    tracing::debug!(id = %todo.id, "todo updated");
    Ok(Json(Envelope::with_message("Todo updated successfully", todo)))
}

pub async fn delete_todo(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ApiError> {
    if !store.delete(id).await {
        return Err(ApiError::NotFound);
    }
    tracing::debug!(%id, "todo deleted");
    Ok(Json(Envelope::message("Todo deleted successfully")))
}

pub async fn toggle_todo(
    State(store): State<SharedStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let todo = store.toggle(id).await.ok_or(ApiError::NotFound)?;
    tracing::debug!(id = %todo.id, completed = todo.completed, "todo toggled");
    Ok(Json(Envelope::with_message("Todo status updated successfully", todo)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(json: &str) -> CreateTodoRequest {
        serde_json::from_str(json).unwrap()
    }

    fn update_request(json: &str) -> UpdateTodoRequest {
        serde_json::from_str(json).unwrap()
    }

    fn validation_errors(err: ApiError) -> FieldErrors {
        match err {
            ApiError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_with_all_fields_validates() {
        let new = create_request(
            r#"{"title":"Buy milk","description":"2 liters","priority":"high","due_date":"2026-01-15"}"#,
        )
        .validate()
        .unwrap();
        assert_eq!(new.title, "Buy milk");
        assert_eq!(new.description.as_deref(), Some("2 liters"));
        assert_eq!(new.priority, Priority::High);
        assert_eq!(new.due_date, NaiveDate::from_ymd_opt(2026, 1, 15));
    }

    #[test]
    fn create_without_optionals_validates() {
        let new = create_request(r#"{"title":"Buy milk","priority":"low"}"#).validate().unwrap();
        assert!(new.description.is_none());
        assert!(new.due_date.is_none());
    }

    #[test]
    fn create_missing_required_fields_collects_both() {
        let errors = validation_errors(create_request(r#"{}"#).validate().unwrap_err());
        assert_eq!(errors["title"], vec!["title is required"]);
        assert_eq!(errors["priority"], vec!["priority is required"]);
    }

    #[test]
    fn create_empty_title_fails() {
        let errors =
            validation_errors(create_request(r#"{"title":"","priority":"low"}"#).validate().unwrap_err());
        assert_eq!(errors["title"], vec!["title must not be empty"]);
    }

    #[test]
    fn create_overlong_title_fails() {
        let long = "x".repeat(256);
        let json = format!(r#"{{"title":"{long}","priority":"low"}}"#);
        let errors = validation_errors(create_request(&json).validate().unwrap_err());
        assert_eq!(errors["title"], vec!["title must be at most 255 characters"]);
    }

    #[test]
    fn create_title_of_exactly_255_chars_passes() {
        let max = "x".repeat(255);
        let json = format!(r#"{{"title":"{max}","priority":"low"}}"#);
        assert!(create_request(&json).validate().is_ok());
    }

    #[test]
    fn create_unknown_priority_fails() {
        let errors = validation_errors(
            create_request(r#"{"title":"t","priority":"urgent"}"#).validate().unwrap_err(),
        );
        assert_eq!(errors["priority"], vec!["priority must be one of low, medium, high"]);
    }

    #[test]
    fn create_bad_due_date_fails() {
        let errors = validation_errors(
            create_request(r#"{"title":"t","priority":"low","due_date":"tomorrow"}"#)
                .validate()
                .unwrap_err(),
        );
        assert_eq!(errors["due_date"], vec!["due_date must be a valid date (YYYY-MM-DD)"]);
    }

    #[test]
    fn update_absent_and_null_are_distinguished() {
        let absent = update_request(r#"{}"#);
        assert!(absent.description.is_none());

        let null = update_request(r#"{"description":null}"#);
        assert_eq!(null.description, Some(None));

        let value = update_request(r#"{"description":"notes"}"#);
        assert_eq!(value.description, Some(Some("notes".to_string())));
    }

    #[test]
    fn update_empty_body_is_an_empty_patch() {
        let patch = update_request(r#"{}"#).validate().unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn update_null_description_clears() {
        let patch = update_request(r#"{"description":null}"#).validate().unwrap();
        assert_eq!(patch.description, Some(None));
    }

    #[test]
    fn update_null_title_fails() {
        let errors = validation_errors(update_request(r#"{"title":null}"#).validate().unwrap_err());
        assert_eq!(errors["title"], vec!["title must not be empty"]);
    }

    #[test]
    fn update_null_completed_fails() {
        let errors = validation_errors(update_request(r#"{"completed":null}"#).validate().unwrap_err());
        assert_eq!(errors["completed"], vec!["completed must be a boolean"]);
    }

    #[test]
    fn update_null_priority_fails() {
        let err = update_request(r#"{"priority":null}"#).validate().unwrap_err();
        assert!(validation_errors(err).contains_key("priority"));
    }

    #[test]
    fn update_valid_subset_builds_patch() {
        let patch = update_request(r#"{"completed":true,"priority":"medium"}"#).validate().unwrap();
        assert_eq!(patch.completed, Some(true));
        assert_eq!(patch.priority, Some(Priority::Medium));
        assert!(patch.title.is_none());
    }

    #[test]
    fn unknown_status_is_ignored() {
        let params = ListParams {
            status: Some("archived".to_string()),
            ..ListParams::default()
        };
        let filter = params.into_filter();
        // the filter must behave as if no status was given
        let todo = sample_todo(true);
        assert!(filter.matches(&todo));
    }

    #[test]
    fn status_completed_builds_completed_filter() {
        let params = ListParams {
            status: Some("completed".to_string()),
            ..ListParams::default()
        };
        let filter = params.into_filter();
        assert!(filter.matches(&sample_todo(true)));
        assert!(!filter.matches(&sample_todo(false)));
    }

    fn sample_todo(completed: bool) -> Todo {
        let now = chrono::Utc::now();
        Todo {
            id: Uuid::new_v4(),
            title: "sample".to_string(),
            description: None,
            completed,
            priority: Priority::Low,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}
