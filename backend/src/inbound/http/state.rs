//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data`, so they depend
//! only on the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{TodoCommand, TodoQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub todos_query: Arc<dyn TodoQuery>,
    pub todos: Arc<dyn TodoCommand>,
}

impl HttpState {
    pub fn new(todos_query: Arc<dyn TodoQuery>, todos: Arc<dyn TodoCommand>) -> Self {
        Self { todos_query, todos }
    }
}
