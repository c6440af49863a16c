//! HTTP/JSON todo service.
//!
//! # Overview
//! A REST-style CRUD API over a single `Todo` resource: create, list with
//! conjunctive filters, show, partial update, toggle, delete. Every
//! response uses the `{success, message?, data?}` envelope.
//!
//! # Design
//! - Handlers validate raw payloads into typed commands at the boundary;
//!   the store never sees unvalidated input.
//! - The store is an in-memory map behind a `RwLock`; every mutation is a
//!   single atomic lock acquisition.
//! - Identifier resolution happens before controller logic, so an unknown
//!   id is a 404 regardless of the payload.

pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod store;

use std::sync::Arc;

use axum::routing::{get, patch};
use axum::Router;
use tokio::net::TcpListener;

pub use crate::error::ApiError;
pub use crate::model::{Priority, Todo};
pub use crate::store::TodoStore;

/// One store shared by all handlers for the process lifetime.
pub type SharedStore = Arc<TodoStore>;

pub fn app() -> Router {
    let store: SharedStore = Arc::new(TodoStore::new());
    Router::new()
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .patch(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/todos/{id}/toggle", patch(handlers::toggle_todo))
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
