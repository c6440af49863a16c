//! In-memory persistence for todos.
//!
//! # Design
//! A `HashMap` behind a `tokio::sync::RwLock`, shared across handlers via
//! `Arc`. Every mutation runs under a single write-lock acquisition, so each
//! create/update/toggle/delete is atomic with respect to concurrent
//! requests. The store knows nothing about HTTP; it speaks `NewTodo`,
//! `TodoPatch` and `TodoFilter` only.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{NewTodo, Todo, TodoFilter, TodoPatch};

/// In-memory todo store.
#[derive(Debug, Default)]
pub struct TodoStore {
    todos: RwLock<HashMap<Uuid, Todo>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new record. Assigns the id and both timestamps; new records
    /// always start out not completed.
    pub async fn insert(&self, new: NewTodo) -> Todo {
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            completed: false,
            priority: new.priority,
            due_date: new.due_date,
            created_at: now,
            updated_at: now,
        };
        self.todos.write().await.insert(todo.id, todo.clone());
        todo
    }

    pub async fn find(&self, id: Uuid) -> Option<Todo> {
        self.todos.read().await.get(&id).cloned()
    }

    /// Records matching `filter`, newest first.
    pub async fn list(&self, filter: &TodoFilter) -> Vec<Todo> {
        let todos = self.todos.read().await;
        let mut matched: Vec<Todo> = todos.values().filter(|todo| filter.matches(todo)).cloned().collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        matched
    }

    /// Apply a partial update and return the freshly re-read record, or
    /// `None` when no record has this id. An empty patch leaves the record
    /// untouched, including `updated_at`.
    pub async fn update(&self, id: Uuid, patch: TodoPatch) -> Option<Todo> {
        let mut todos = self.todos.write().await;
        let todo = todos.get_mut(&id)?;
        if patch.is_empty() {
            return Some(todo.clone());
        }
        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(description) = patch.description {
            todo.description = description;
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        if let Some(priority) = patch.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            todo.due_date = due_date;
        }
        todo.updated_at = Utc::now();
        Some(todo.clone())
    }

    /// Flip the completion flag under a single write lock and return the
    /// updated record.
    pub async fn toggle(&self, id: Uuid) -> Option<Todo> {
        let mut todos = self.todos.write().await;
        let todo = todos.get_mut(&id)?;
        todo.completed = !todo.completed;
        todo.updated_at = Utc::now();
        Some(todo.clone())
    }

    /// Remove the record permanently. Returns whether a record existed.
    pub async fn delete(&self, id: Uuid) -> bool {
        self.todos.write().await.remove(&id).is_some()
    }
}
