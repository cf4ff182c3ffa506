//! Per-row exclusive locks with bounded waits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex as RowMutex, OwnedMutexGuard};
use tracing::debug;

use crate::domain::TodoId;
use crate::domain::ports::{RepositoryError, RepositoryResult};

/// Held lock on one row. Dropping it releases the row.
pub(crate) type RowGuard = OwnedMutexGuard<()>;

/// Registry of row mutexes keyed by todo id.
///
/// Entries are created on first use and pruned on release once no other
/// session holds or awaits them.
#[derive(Debug, Default)]
pub(crate) struct RowLocks {
    rows: Mutex<HashMap<TodoId, Arc<RowMutex<()>>>>,
}

impl RowLocks {
    fn entry(&self, id: &TodoId) -> Arc<RowMutex<()>> {
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(rows.entry(*id).or_default())
    }

    /// Wait up to `wait` for exclusive ownership of the row.
    pub(crate) async fn acquire(&self, id: &TodoId, wait: Duration) -> RepositoryResult<RowGuard> {
        let row = self.entry(id);
        tokio::time::timeout(wait, row.lock_owned())
            .await
            .map_err(|_| {
                debug!(todo_id = %id, ?wait, "row lock wait timed out");
                RepositoryError::unhandled_exception("row lock wait timed out")
            })
    }

    /// Release a held row and prune its entry when nobody else wants it.
    pub(crate) fn release(&self, id: &TodoId, guard: RowGuard) {
        drop(guard);
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        if rows
            .get(id)
            .is_some_and(|row| Arc::strong_count(row) == 1)
        {
            rows.remove(id);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
