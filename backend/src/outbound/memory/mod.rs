//! Process-local todo store.
//!
//! Used by tests and by local runs without a database. It honours the same
//! contract as the PostgreSQL adapter:
//!
//! - writes made inside a transaction are staged and become visible to other
//!   sessions only on commit;
//! - `RowLock::ForUpdate` and every write take an exclusive per-row lock that
//!   is held until the session ends, with a bounded wait;
//! - names outside 1..=255 characters are rejected as constraint violations.
//!
//! Dropping a session without committing discards its staged writes and
//! releases its row locks.

mod row_locks;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::debug;

use crate::domain::ports::{
    RepositoryError, RepositoryResult, RowLock, TodoRepository, TodoStore, expect_one,
};
use crate::domain::{TODO_NAME_MAX, Todo, TodoForSave, TodoId};

use self::row_locks::{RowGuard, RowLocks};

const DEFAULT_WRITE_LOCK_WAIT: Duration = Duration::from_secs(5);
const NAME_LENGTH_CONSTRAINT: &str = "todos_name_length";

type Table = BTreeMap<TodoId, Todo>;

#[derive(Debug, Default)]
struct Shared {
    table: Mutex<Table>,
    locks: RowLocks,
}

impl Shared {
    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory implementation of [`TodoStore`].
#[derive(Clone)]
pub struct InMemoryTodoStore {
    shared: Arc<Shared>,
    clock: Arc<dyn Clock>,
    write_lock_wait: Duration,
}

impl InMemoryTodoStore {
    /// Create an empty store stamping writes with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Arc::default(),
            clock,
            write_lock_wait: DEFAULT_WRITE_LOCK_WAIT,
        }
    }

    /// How long a write waits for a row another session has locked.
    pub fn with_write_lock_wait(mut self, wait: Duration) -> Self {
        self.write_lock_wait = wait;
        self
    }

    fn session(&self, transactional: bool) -> InMemoryTodoRepository {
        InMemoryTodoRepository {
            shared: Arc::clone(&self.shared),
            clock: Arc::clone(&self.clock),
            write_lock_wait: self.write_lock_wait,
            transactional,
            staged: BTreeMap::new(),
            held: HashMap::new(),
        }
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    type Repository = InMemoryTodoRepository;

    async fn read<T, F>(&self, work: F) -> RepositoryResult<T>
    where
        T: Send,
        F: for<'r> FnOnce(&'r mut Self::Repository) -> BoxFuture<'r, RepositoryResult<T>> + Send,
    {
        let mut repo = self.session(false);
        work(&mut repo).await
    }

    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send,
        E: From<RepositoryError> + Send,
        F: for<'r> FnOnce(&'r mut Self::Repository) -> BoxFuture<'r, Result<T, E>> + Send,
    {
        let mut repo = self.session(true);
        let result = work(&mut repo).await;
        match &result {
            Ok(_) => repo.commit(),
            Err(_) => {
                repo.rollback();
                debug!("transaction rolled back");
            }
        }
        result
    }
}

/// Repository session over an [`InMemoryTodoStore`].
///
/// `staged` maps ids to their pending state; `None` marks a pending delete.
pub struct InMemoryTodoRepository {
    shared: Arc<Shared>,
    clock: Arc<dyn Clock>,
    write_lock_wait: Duration,
    transactional: bool,
    staged: BTreeMap<TodoId, Option<Todo>>,
    held: HashMap<TodoId, RowGuard>,
}

impl InMemoryTodoRepository {
    async fn lock_row(&mut self, id: &TodoId, wait: Duration) -> RepositoryResult<()> {
        if self.held.contains_key(id) {
            return Ok(());
        }
        let guard = self.shared.locks.acquire(id, wait).await?;
        self.held.insert(*id, guard);
        Ok(())
    }

    /// Current state of one row as this session sees it.
    fn visible(&self, id: &TodoId) -> Option<Todo> {
        match self.staged.get(id) {
            Some(pending) => pending.clone(),
            None => self.shared.table().get(id).cloned(),
        }
    }

    /// Rows matching `completed`, ordered by creation time then id.
    fn visible_rows(&self, completed: Option<bool>) -> Vec<Todo> {
        let mut rows: Table = self.shared.table().clone();
        for (id, pending) in &self.staged {
            match pending {
                Some(todo) => rows.insert(*id, todo.clone()),
                None => rows.remove(id),
            };
        }
        let mut rows: Vec<Todo> = rows
            .into_values()
            .filter(|todo| completed.is_none_or(|wanted| todo.is_completed() == wanted))
            .collect();
        rows.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        rows
    }

    fn write(&mut self, id: TodoId, state: Option<Todo>) {
        if self.transactional {
            self.staged.insert(id, state);
        } else {
            publish(&mut self.shared.table(), id, state);
        }
    }

    fn commit(&mut self) {
        let staged = std::mem::take(&mut self.staged);
        {
            let mut table = self.shared.table();
            for (id, state) in staged {
                publish(&mut table, id, state);
            }
        }
        self.release_rows();
    }

    fn rollback(&mut self) {
        self.staged.clear();
        self.release_rows();
    }

    fn release_rows(&mut self) {
        for (id, guard) in self.held.drain() {
            self.shared.locks.release(&id, guard);
        }
    }
}

impl Drop for InMemoryTodoRepository {
    fn drop(&mut self) {
        self.release_rows();
    }
}

fn publish(table: &mut Table, id: TodoId, state: Option<Todo>) {
    match state {
        Some(todo) => table.insert(id, todo),
        None => table.remove(&id),
    };
}

fn check_name(name: &str) -> RepositoryResult<()> {
    let length = name.chars().count();
    if (1..=TODO_NAME_MAX).contains(&length) {
        Ok(())
    } else {
        Err(RepositoryError::record_constraint_violation(
            NAME_LENGTH_CONSTRAINT,
        ))
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(
        &mut self,
        request: PageRequest,
        completed: Option<bool>,
    ) -> RepositoryResult<Page<Todo>> {
        let rows = self.visible_rows(completed);
        let total_rows = rows.len() as u64;
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let data = rows.into_iter().skip(skip).take(take).collect();
        Ok(Page::new(request, data, total_rows))
    }

    async fn count(&mut self, completed: Option<bool>) -> RepositoryResult<u64> {
        Ok(self.visible_rows(completed).len() as u64)
    }

    async fn get_by_id(&mut self, id: &TodoId, lock: RowLock) -> RepositoryResult<Todo> {
        if let RowLock::ForUpdate { wait } = lock {
            self.lock_row(id, wait).await?;
        }
        self.visible(id)
            .ok_or_else(RepositoryError::record_not_found)
    }

    async fn upsert(&mut self, todo: &TodoForSave) -> RepositoryResult<Todo> {
        check_name(&todo.name)?;
        self.lock_row(&todo.id, self.write_lock_wait).await?;

        let now = self.clock.utc();
        let saved = match self.visible(&todo.id) {
            Some(existing) => Todo {
                id: todo.id,
                name: todo.name.clone(),
                completed_at: todo.completed_at,
                created_at: existing.created_at,
                modified_at: now.max(existing.modified_at),
            },
            None => Todo {
                id: todo.id,
                name: todo.name.clone(),
                completed_at: todo.completed_at,
                created_at: now,
                modified_at: now,
            },
        };
        self.write(todo.id, Some(saved.clone()));
        Ok(saved)
    }

    async fn delete(&mut self, id: &TodoId) -> RepositoryResult<()> {
        self.lock_row(id, self.write_lock_wait).await?;
        let affected = usize::from(self.visible(id).is_some());
        if affected == 1 {
            self.write(*id, None);
        }
        expect_one(affected)
    }
}
