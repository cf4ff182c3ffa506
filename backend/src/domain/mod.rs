//! Domain primitives, ports and use cases.
//!
//! Purpose: keep todo semantics (the completion merge rule, error taxonomy,
//! transaction-scoped use cases) free of transport and storage concerns.
//!
//! Public surface:
//! - Todo and its write shapes (`TodoForCreate`, `TodoForUpdate`,
//!   `TodoForSave`).
//! - TodoServiceError: failures returned by the driving ports.
//! - TodoService: the use cases, generic over a `ports::TodoStore`.

pub mod error;
pub mod ports;
pub mod todo;
mod todo_service;

pub use self::error::TodoServiceError;
pub use self::todo::{
    TODO_NAME_MAX, Todo, TodoForCreate, TodoForSave, TodoForUpdate, TodoId, TodoIdError,
};
pub use self::todo_service::{TodoService, TodoServiceConfig};
