//! PostgreSQL-backed todo repository.
//!
//! A [`DieselTodoRepository`] owns one pooled connection. The store decides
//! whether that connection runs in autocommit mode or inside a transaction;
//! the repository only issues statements.

use std::time::Duration;

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Text, Timestamptz};
use diesel::upsert::excluded;
use diesel_async::{AnsiTransactionManager, RunQueryDsl, TransactionManager};
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    AffectedRowsExt, OptionalRecordExt, RepositoryError, RepositoryResult, RowLock,
    TodoRepository,
};
use crate::domain::{Todo, TodoForSave, TodoId};

use super::diesel_error_mapping::map_diesel_error;
use super::models::{NewTodoRow, TodoRow};
use super::pool::OwnedConnection;
use super::schema::todos;

diesel::define_sql_function! {
    fn greatest(a: Timestamptz, b: Timestamptz) -> Timestamptz;
}

/// Diesel-backed implementation of [`TodoRepository`].
pub struct DieselTodoRepository {
    conn: OwnedConnection,
}

fn filtered(completed: Option<bool>) -> todos::BoxedQuery<'static, Pg> {
    let query = todos::table.into_boxed();
    match completed {
        Some(true) => query.filter(todos::completed_at.is_not_null()),
        Some(false) => query.filter(todos::completed_at.is_null()),
        None => query,
    }
}

fn to_i64(value: u64, what: &str) -> RepositoryResult<i64> {
    i64::try_from(value)
        .map_err(|_| RepositoryError::unhandled_exception(format!("{what} out of range: {value}")))
}

/// Postgres treats a zero `lock_timeout` as "wait forever".
fn lock_timeout_setting(wait: Duration) -> String {
    format!("{}ms", wait.as_millis().max(1))
}

/// Transaction control failures are never constraint violations.
fn transaction_error(error: diesel::result::Error) -> RepositoryError {
    RepositoryError::unhandled_exception(map_diesel_error(error).to_string())
}

impl DieselTodoRepository {
    pub(crate) fn new(conn: OwnedConnection) -> Self {
        Self { conn }
    }

    pub(crate) async fn begin(&mut self) -> RepositoryResult<()> {
        AnsiTransactionManager::begin_transaction(&mut *self.conn)
            .await
            .map_err(transaction_error)
    }

    pub(crate) async fn commit(&mut self) -> RepositoryResult<()> {
        AnsiTransactionManager::commit_transaction(&mut *self.conn)
            .await
            .map_err(transaction_error)
    }

    pub(crate) async fn rollback(&mut self) -> RepositoryResult<()> {
        AnsiTransactionManager::rollback_transaction(&mut *self.conn)
            .await
            .map_err(transaction_error)
    }

    /// Bound the wait for row locks for the rest of the current transaction.
    async fn set_lock_timeout(&mut self, wait: Duration) -> RepositoryResult<()> {
        diesel::sql_query("SELECT set_config('lock_timeout', $1, true)")
            .bind::<Text, _>(lock_timeout_setting(wait))
            .execute(&mut *self.conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn list(
        &mut self,
        request: PageRequest,
        completed: Option<bool>,
    ) -> RepositoryResult<Page<Todo>> {
        let total_rows = self.count(completed).await?;
        let limit = to_i64(request.limit(), "page size")?;
        let offset = to_i64(request.offset(), "page offset")?;

        let rows: Vec<TodoRow> = filtered(completed)
            .order((todos::created_at.asc(), todos::id.asc()))
            .limit(limit)
            .offset(offset)
            .select(TodoRow::as_select())
            .load(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;

        let data = rows.into_iter().map(Todo::from).collect();
        Ok(Page::new(request, data, total_rows))
    }

    async fn count(&mut self, completed: Option<bool>) -> RepositoryResult<u64> {
        let total: i64 = filtered(completed)
            .count()
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total)
            .map_err(|_| RepositoryError::unhandled_exception(format!("negative count: {total}")))
    }

    async fn get_by_id(&mut self, id: &TodoId, lock: RowLock) -> RepositoryResult<Todo> {
        let query = todos::table
            .find(*id.as_uuid())
            .select(TodoRow::as_select());

        let row = match lock {
            RowLock::None => query.get_result(&mut *self.conn).await.optional(),
            RowLock::ForUpdate { wait } => {
                self.set_lock_timeout(wait).await?;
                query
                    .for_update()
                    .get_result(&mut *self.conn)
                    .await
                    .optional()
            }
        };

        row.map_err(map_diesel_error).or_not_found().map(Todo::from)
    }

    async fn upsert(&mut self, todo: &TodoForSave) -> RepositoryResult<Todo> {
        diesel::insert_into(todos::table)
            .values(NewTodoRow::from(todo))
            .on_conflict(todos::id)
            .do_update()
            .set((
                todos::name.eq(excluded(todos::name)),
                todos::completed_at.eq(excluded(todos::completed_at)),
                // `now()` is the transaction start, which can predate a write
                // committed while this one waited on the row lock.
                todos::modified_at.eq(greatest(now, todos::modified_at)),
            ))
            .returning(TodoRow::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map(Todo::from)
            .map_err(map_diesel_error)
    }

    async fn delete(&mut self, id: &TodoId) -> RepositoryResult<()> {
        diesel::delete(todos::table.find(*id.as_uuid()))
            .execute(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
            .expect_one()
    }
}
