//! Driving port for todo mutations.
//!
//! Inbound adapters use this port to create, update and delete todos without
//! importing persistence concerns. Each call runs as a single transaction.

use async_trait::async_trait;

use crate::domain::{Todo, TodoForCreate, TodoForUpdate, TodoId, TodoServiceError};

/// Domain use-case port for changing todos.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoCommand: Send + Sync {
    /// Create a todo under a freshly assigned id.
    async fn create(&self, todo: TodoForCreate) -> Result<Todo, TodoServiceError>;

    /// Rename and complete or reopen an existing todo.
    async fn update(&self, todo: TodoForUpdate) -> Result<Todo, TodoServiceError>;

    /// Remove a todo permanently.
    async fn delete(&self, id: &TodoId) -> Result<(), TodoServiceError>;
}

/// Fixture command that rejects every mutation as unhandled.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTodoCommand;

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl TodoCommand for FixtureTodoCommand {
    async fn create(&self, _todo: TodoForCreate) -> Result<Todo, TodoServiceError> {
        Err(TodoServiceError::unhandled("fixture store is read-only"))
    }

    async fn update(&self, todo: TodoForUpdate) -> Result<Todo, TodoServiceError> {
        Err(TodoServiceError::todo_not_found(todo.id))
    }

    async fn delete(&self, id: &TodoId) -> Result<(), TodoServiceError> {
        Err(TodoServiceError::todo_not_found(*id))
    }
}
