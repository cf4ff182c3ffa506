//! Todo use cases.
//!
//! [`TodoService`] implements the driving ports on top of any [`TodoStore`].
//! Reads run through [`TodoStore::read`]; every mutation is one
//! [`TodoStore::transaction`], so a failure at any step rolls back the steps
//! before it.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::FutureExt;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::debug;

use crate::domain::ports::{
    ListTodosRequest, RepositoryError, RowLock, TodoCommand, TodoQuery, TodoRepository,
    TodoStore,
};
use crate::domain::{Todo, TodoForCreate, TodoForUpdate, TodoId, TodoServiceError};

const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::MIN.saturating_add(19);
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for [`TodoService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoServiceConfig {
    default_page_size: NonZeroU32,
    lock_timeout: Duration,
}

impl TodoServiceConfig {
    /// Page size used when a list request does not name one.
    pub fn with_default_page_size(mut self, page_size: NonZeroU32) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Upper bound on waiting for a row lock during updates.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Page size applied when a list request omits one.
    #[must_use]
    pub fn default_page_size(&self) -> NonZeroU32 {
        self.default_page_size
    }

    /// Longest wait for a row lock before an update fails.
    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }
}

impl Default for TodoServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

/// Todo service implementing [`TodoQuery`] and [`TodoCommand`].
#[derive(Clone)]
pub struct TodoService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: TodoServiceConfig,
}

impl<S> TodoService<S> {
    /// Create a service over `store`, stamping completions with `clock`.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use todo_backend::domain::{TodoService, TodoServiceConfig};
    /// use todo_backend::outbound::memory::InMemoryTodoStore;
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let store = Arc::new(InMemoryTodoStore::new(clock.clone()));
    /// let _service = TodoService::new(store, clock, TodoServiceConfig::default());
    /// ```
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, config: TodoServiceConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    fn page_request(&self, request: &ListTodosRequest) -> PageRequest {
        PageRequest::new(
            request.page_size.unwrap_or(self.config.default_page_size),
            request.page.unwrap_or(NonZeroU32::MIN),
        )
    }
}

/// Map a store failure where absence means the addressed todo is missing.
fn map_repository_error(error: RepositoryError, id: &TodoId) -> TodoServiceError {
    match error {
        RepositoryError::RecordNotFound => {
            debug!(todo_id = %id, "todo not found");
            TodoServiceError::todo_not_found(*id)
        }
        other => TodoServiceError::from(other),
    }
}

#[async_trait]
impl<S> TodoQuery for TodoService<S>
where
    S: TodoStore,
{
    async fn list(&self, request: ListTodosRequest) -> Result<Page<Todo>, TodoServiceError> {
        let page = self.page_request(&request);
        let completed = request.completed;
        self.store
            .read(move |repo| async move { repo.list(page, completed).await }.boxed())
            .await
            .map_err(TodoServiceError::from)
    }

    async fn get(&self, id: &TodoId) -> Result<Todo, TodoServiceError> {
        let id = *id;
        self.store
            .read(move |repo| async move { repo.get_by_id(&id, RowLock::None).await }.boxed())
            .await
            .map_err(|err| map_repository_error(err, &id))
    }
}

#[async_trait]
impl<S> TodoCommand for TodoService<S>
where
    S: TodoStore,
{
    async fn create(&self, todo: TodoForCreate) -> Result<Todo, TodoServiceError> {
        let save = todo.into_save(TodoId::random());
        self.store
            .transaction(move |repo| {
                async move { repo.upsert(&save).await.map_err(TodoServiceError::from) }.boxed()
            })
            .await
    }

    async fn update(&self, todo: TodoForUpdate) -> Result<Todo, TodoServiceError> {
        let lock = RowLock::ForUpdate {
            wait: self.config.lock_timeout,
        };
        let clock = Arc::clone(&self.clock);
        self.store
            .transaction(move |repo| {
                async move {
                    let current = repo
                        .get_by_id(&todo.id, lock)
                        .await
                        .map_err(|err| map_repository_error(err, &todo.id))?;
                    let mut save = current.to_save();
                    save.apply_update(&todo, clock.utc());
                    repo.upsert(&save).await.map_err(TodoServiceError::from)
                }
                .boxed()
            })
            .await
    }

    async fn delete(&self, id: &TodoId) -> Result<(), TodoServiceError> {
        let id = *id;
        self.store
            .transaction(move |repo| {
                async move {
                    repo.delete(&id)
                        .await
                        .map_err(|err| map_repository_error(err, &id))
                }
                .boxed()
            })
            .await
    }
}

#[cfg(test)]
#[path = "todo_service_tests.rs"]
mod tests;
