//! Driving port for todo reads.

use std::num::NonZeroU32;

use async_trait::async_trait;
use pagination::Page;
#[cfg(any(test, feature = "test-support"))]
use pagination::PageRequest;

use crate::domain::{Todo, TodoId, TodoServiceError};

/// Parameters for listing todos.
///
/// Missing paging values fall back to the service defaults (page 1 and the
/// configured default page size).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListTodosRequest {
    pub page_size: Option<NonZeroU32>,
    pub page: Option<NonZeroU32>,
    pub completed: Option<bool>,
}

/// Domain use-case port for reading todos.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoQuery: Send + Sync {
    /// One page of todos, oldest first.
    async fn list(&self, request: ListTodosRequest) -> Result<Page<Todo>, TodoServiceError>;

    /// Fetch one todo by id.
    async fn get(&self, id: &TodoId) -> Result<Todo, TodoServiceError>;
}

/// Fixture query backed by nothing: lists are empty and lookups miss.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTodoQuery;

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl TodoQuery for FixtureTodoQuery {
    async fn list(&self, request: ListTodosRequest) -> Result<Page<Todo>, TodoServiceError> {
        let page = PageRequest::new(
            request.page_size.unwrap_or(NonZeroU32::MIN),
            request.page.unwrap_or(NonZeroU32::MIN),
        );
        Ok(Page::new(page, Vec::new(), 0))
    }

    async fn get(&self, id: &TodoId) -> Result<Todo, TodoServiceError> {
        Err(TodoServiceError::todo_not_found(*id))
    }
}
