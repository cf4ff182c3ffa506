//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository translates between Diesel rows and
//!   domain types; transaction policy lives in [`DieselTodoStore`].
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Async pooling**: connections come from a `bb8` pool through
//!   `diesel-async`; migrations run on a blocking worker.
//! - **Typed errors**: every Diesel and pool failure is classified into
//!   [`crate::domain::ports::RepositoryError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use todo_backend::outbound::persistence::{
//!     DbPool, DieselTodoStore, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/todo";
//! run_pending_migrations(url).await?;
//! let store = DieselTodoStore::new(DbPool::new(PoolConfig::new(url)).await?);
//! # let _ = store;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_todo_repository;
mod diesel_todo_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_todo_repository::DieselTodoRepository;
pub use diesel_todo_store::DieselTodoStore;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, OwnedConnection, PoolConfig, PoolError};
