//! Domain model for the todo service.
//!
//! # Design
//! `Todo` is the stored shape; `NewTodo` and `TodoPatch` are the validated
//! commands the handlers hand to the store. `TodoFilter` composes the three
//! list predicates (completion status, priority, title search) and is the
//! only thing the store knows about querying, keeping the HTTP layer out of
//! the storage code.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A single todo item as stored and served by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task priority. Serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Error returned when parsing an unknown priority value.
#[derive(Debug, Error)]
#[error("unknown priority: {0}")]
pub struct UnknownPriority(String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(UnknownPriority(other.to_string())),
        }
    }
}

/// Validated payload for inserting a new todo. New records always start
/// with `completed = false`; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

/// Partial update applied to an existing todo. An outer `None` leaves the
/// field unchanged; for the nullable fields the inner `Option` distinguishes
/// "set to a value" from "clear".
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TodoPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Conjunctive filter over the todo collection. All predicates that are set
/// must match.
///
/// The priority predicate compares raw strings: a value outside the known
/// set matches no record rather than erroring, so callers decide whether to
/// constrain it.
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    completed: Option<bool>,
    priority: Option<String>,
    search: Option<String>,
}

impl TodoFilter {
    /// Select only completed records.
    pub fn completed(mut self) -> Self {
        self.completed = Some(true);
        self
    }

    /// Select only records not yet completed.
    pub fn pending(mut self) -> Self {
        self.completed = Some(false);
        self
    }

    /// Select records whose priority equals `value`.
    pub fn by_priority(mut self, value: impl Into<String>) -> Self {
        self.priority = Some(value.into());
        self
    }

    /// Select records whose title contains `needle`, case-insensitively.
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        if let Some(completed) = self.completed {
            if todo.completed != completed {
                return false;
            }
        }
        if let Some(priority) = self.priority.as_deref() {
            if todo.priority.as_str() != priority {
                return false;
            }
        }
        if let Some(needle) = self.search.as_deref() {
            if !todo.title.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}
