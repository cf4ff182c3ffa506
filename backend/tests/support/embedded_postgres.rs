//! Embedded PostgreSQL for the store contract tests.
//!
//! One cluster serves every test in the binary. Each test gets its own
//! database cloned from a template that already carries the migrations, so
//! tests never see each other's rows and can run in parallel.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use diesel::{Connection, PgConnection};
use diesel_migrations::MigrationHarness;
use env_lock::lock_env;
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

use todo_backend::outbound::persistence::MIGRATIONS;

const TEMPLATE_PREFIX: &str = "todo_template";
const SETUP_RETRIES: usize = 5;
const SETUP_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A reused data directory keeps the password it was initialised with.
const STABLE_PASSWORD: &str = "todo_embedded_test";

static TEMPLATE_LOCK: Mutex<()> = Mutex::new(());

fn retry<T>(what: &str, mut attempt_once: impl FnMut() -> Result<T, String>) -> Result<T, String> {
    let mut attempt = 1;
    loop {
        match attempt_once() {
            Ok(value) => return Ok(value),
            Err(error) if attempt >= SETUP_RETRIES => {
                return Err(format!("{what}: attempt {attempt}/{SETUP_RETRIES}: {error}"));
            }
            Err(_) => {
                std::thread::sleep(SETUP_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Start (or join) the process-wide cluster.
pub fn cluster() -> Result<&'static ClusterHandle, String> {
    let _password = std::env::var_os("PG_PASSWORD")
        .is_none()
        .then(|| lock_env([("PG_PASSWORD", Some(STABLE_PASSWORD))]));
    retry("start embedded cluster", || {
        shared_cluster_handle().map_err(|error| error.to_string())
    })
}

fn template_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|error| format!("hash migrations: {error}"))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short}"))
}

/// Apply every embedded migration to the database at `url`.
pub fn migrate(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|error| format!("connect: {error}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|error| format!("migrate: {error}"))
}

/// Create the migrated template once per migration set.
fn ensure_template(cluster: &ClusterHandle) -> Result<String, String> {
    let name = template_name()?;
    let _lock = TEMPLATE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|error| format!("template check: {error:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|error| format!("create template: {error:?}"))?;
        migrate(&cluster.connection().database_url(&name))?;
    }
    Ok(name)
}

/// A fresh, migrated database dropped again when the handle is.
pub fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    retry("provision test database", || {
        let template = ensure_template(cluster)?;
        let name = format!("todo_test_{}", Uuid::new_v4().simple());
        cluster
            .temporary_database_from_template(name.as_str(), template.as_str())
            .map_err(|error| format!("clone template: {error:?}"))
    })
}

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when the environment opts out of the cluster, fail loudly otherwise.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
