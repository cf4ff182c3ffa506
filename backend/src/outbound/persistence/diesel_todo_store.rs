//! PostgreSQL-backed transaction boundary.
//!
//! Each session checks out one connection, wraps it in a
//! [`DieselTodoRepository`] and lends that to the caller's closure. The
//! closure's `Result` alone decides between commit and rollback.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use crate::domain::ports::{RepositoryError, RepositoryResult, TodoStore};

use super::diesel_error_mapping::map_pool_error;
use super::diesel_todo_repository::DieselTodoRepository;
use super::pool::DbPool;

/// Diesel-backed implementation of [`TodoStore`].
#[derive(Clone)]
pub struct DieselTodoStore {
    pool: DbPool,
}

impl DieselTodoStore {
    /// Create a store drawing connections from `pool`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use todo_backend::outbound::persistence::{DbPool, DieselTodoStore, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/todo")).await?;
    /// let store = DieselTodoStore::new(pool);
    /// # let _ = store;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn checkout(&self) -> RepositoryResult<DieselTodoRepository> {
        self.pool
            .get_owned()
            .await
            .map(DieselTodoRepository::new)
            .map_err(map_pool_error)
    }
}

#[async_trait]
impl TodoStore for DieselTodoStore {
    type Repository = DieselTodoRepository;

    async fn read<T, F>(&self, work: F) -> RepositoryResult<T>
    where
        T: Send,
        F: for<'r> FnOnce(&'r mut Self::Repository) -> BoxFuture<'r, RepositoryResult<T>> + Send,
    {
        let mut repo = self.checkout().await?;
        work(&mut repo).await
    }

    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send,
        E: From<RepositoryError> + Send,
        F: for<'r> FnOnce(&'r mut Self::Repository) -> BoxFuture<'r, Result<T, E>> + Send,
    {
        let mut repo = self.checkout().await?;
        repo.begin().await?;

        match work(&mut repo).await {
            Ok(value) => {
                repo.commit().await?;
                Ok(value)
            }
            Err(err) => {
                match repo.rollback().await {
                    Ok(()) => debug!("transaction rolled back"),
                    Err(rollback) => warn!(error = %rollback, "transaction rollback failed"),
                }
                Err(err)
            }
        }
    }
}
