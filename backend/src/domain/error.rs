//! Service-level failures surfaced to driving adapters.
//!
//! Inbound adapters map these to transport responses. Store detail is kept
//! in `Unhandled::message` for logs and never shown to callers.

use tracing::error;

use crate::domain::TodoId;
use crate::domain::ports::{RepositoryError, define_port_error};

define_port_error! {
    /// Errors returned by the todo use cases.
    pub enum TodoServiceError {
        /// The addressed todo does not exist.
        TodoNotFound { id: TodoId } => "todo not found: todoId={id}",
        /// Any failure the caller cannot act on.
        Unhandled { message: String } => "unhandled service error: {message}",
    }
}

impl From<RepositoryError> for TodoServiceError {
    /// Map a store failure that carries no not-found context.
    ///
    /// A `RecordNotFound` reaching this path was not anticipated by the use
    /// case, so it is logged as unexpected before being surfaced.
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RecordNotFound => {
                error!(error = %err, "unexpected record not found");
                Self::unhandled(err.to_string())
            }
            RepositoryError::RecordConstraintViolation { message }
            | RepositoryError::UnhandledException { message } => Self::unhandled(message),
        }
    }
}
