//! Driven port for store sessions and transaction boundaries.
//!
//! Services never begin or end transactions themselves. They hand a closure
//! to [`TodoStore::transaction`], and the adapter commits when the closure
//! returns `Ok` and rolls back explicitly when it returns `Err`. Business
//! failures therefore undo earlier writes in the same unit of work, not only
//! store-level failures.

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use super::{RepositoryError, RepositoryResult, TodoRepository};

/// Port for acquiring todo repositories with a session boundary.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Repository handle bound to one store connection.
    type Repository: TodoRepository + Send;

    /// Run read-only work without opening a transaction.
    async fn read<T, F>(&self, work: F) -> RepositoryResult<T>
    where
        T: Send,
        F: for<'r> FnOnce(&'r mut Self::Repository) -> BoxFuture<'r, RepositoryResult<T>> + Send;

    /// Run `work` as one transaction.
    ///
    /// - `Ok` commits; a failed commit becomes `E::from(UnhandledException)`.
    /// - `Err` rolls back and is returned unchanged. A failed rollback is
    ///   logged and does not replace the error.
    ///
    /// Dropping the returned future before it completes never commits.
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send,
        E: From<RepositoryError> + Send,
        F: for<'r> FnOnce(&'r mut Self::Repository) -> BoxFuture<'r, Result<T, E>> + Send;
}
