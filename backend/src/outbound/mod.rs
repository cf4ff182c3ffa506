//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL-backed store using Diesel ORM.
//! - **memory**: process-local store with the same transaction and row-lock
//!   contract, used without a database.
//!
//! Adapters translate between domain types and store representations. They
//! contain no business logic.

pub mod memory;
pub mod persistence;
