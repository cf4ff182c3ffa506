//! Shared helpers for integration tests that need PostgreSQL.
//!
//! Suites start an embedded cluster by default. Setting `SKIP_TEST_CLUSTER`
//! turns a failed start into a skip; without it the failure panics so a
//! broken environment cannot pass silently.

pub mod embedded_postgres;

pub use embedded_postgres::{cluster, handle_cluster_setup_failure, provision_database};
