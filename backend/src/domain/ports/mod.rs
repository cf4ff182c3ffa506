//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`TodoQuery`], [`TodoCommand`]) are what inbound adapters
//! call. Driven ports ([`TodoStore`], [`TodoRepository`]) are what outbound
//! adapters implement. Store failures cross the boundary as
//! [`RepositoryError`] values.

mod macros;
pub(crate) use macros::define_port_error;

mod repository_error;
mod todo_command;
mod todo_query;
mod todo_repository;
mod todo_store;

pub use repository_error::{
    AffectedRowsExt, IgnoreNotFoundExt, OptionalRecordExt, RecordExt, RepositoryError,
    RepositoryResult, expect_one,
};
#[cfg(test)]
pub use todo_command::MockTodoCommand;
#[cfg(any(test, feature = "test-support"))]
pub use todo_command::FixtureTodoCommand;
pub use todo_command::TodoCommand;
#[cfg(test)]
pub use todo_query::MockTodoQuery;
#[cfg(any(test, feature = "test-support"))]
pub use todo_query::FixtureTodoQuery;
pub use todo_query::{ListTodosRequest, TodoQuery};
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
pub use todo_repository::{RowLock, TodoRepository};
pub use todo_store::TodoStore;
