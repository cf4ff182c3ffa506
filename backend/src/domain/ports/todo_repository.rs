//! Driven port for todo persistence inside one store session.
//!
//! A [`TodoRepository`] handle exclusively owns one store connection for the
//! duration of a [`super::TodoStore::read`] or
//! [`super::TodoStore::transaction`] call, which is why every method takes
//! `&mut self`. Handles are lent to the caller's closure and cannot escape it.

use std::time::Duration;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Todo, TodoForSave, TodoId};

use super::RepositoryResult;

/// Row-level locking requested by [`TodoRepository::get_by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLock {
    /// Plain read with no lock.
    #[default]
    None,
    /// Exclusive write lock held until the owning transaction ends.
    ///
    /// Waiting longer than `wait` for a competing holder fails with
    /// [`super::RepositoryError::UnhandledException`].
    ForUpdate { wait: Duration },
}

/// Port for reading and writing todos.
///
/// `completed` filters follow one rule everywhere: `Some(true)` selects rows
/// with a completion timestamp, `Some(false)` rows without one, `None` all
/// rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send {
    /// One page of todos ordered by creation time, oldest first.
    async fn list(
        &mut self,
        request: PageRequest,
        completed: Option<bool>,
    ) -> RepositoryResult<Page<Todo>>;

    /// Number of todos matching the filter.
    async fn count(&mut self, completed: Option<bool>) -> RepositoryResult<u64>;

    /// Fetch one todo, optionally locking its row.
    ///
    /// Absence is reported as [`super::RepositoryError::RecordNotFound`].
    async fn get_by_id(&mut self, id: &TodoId, lock: RowLock) -> RepositoryResult<Todo>;

    /// Insert the todo or overwrite the row with the same id.
    ///
    /// The store stamps `modified_at` (and `created_at` on insert) and the
    /// post-write row is returned.
    async fn upsert(&mut self, todo: &TodoForSave) -> RepositoryResult<Todo>;

    /// Delete exactly one todo.
    async fn delete(&mut self, id: &TodoId) -> RepositoryResult<()>;
}
