//! Classification of Diesel and pool failures into [`RepositoryError`].

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::RepositoryError;

use super::pool::PoolError;

/// Message reported when Postgres cancels a statement on `lock_timeout`.
const LOCK_TIMEOUT_MARKER: &str = "lock timeout";

/// Map a pool failure. Every pool failure is unhandled from the caller's
/// point of view, including checkout timeouts.
pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    debug!(%error, "connection checkout failed");
    RepositoryError::unhandled_exception(error.to_string())
}

/// Map a Diesel failure.
///
/// Integrity constraint kinds become `RecordConstraintViolation`, a missing
/// row becomes `RecordNotFound`, and everything else is unhandled.
pub(crate) fn map_diesel_error(error: DieselError) -> RepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => RepositoryError::record_not_found(),
        DieselError::DatabaseError(kind, info) => map_database_error(kind, info.as_ref()),
        other => RepositoryError::unhandled_exception(other.to_string()),
    }
}

fn map_database_error(
    kind: DatabaseErrorKind,
    info: &(dyn DatabaseErrorInformation + Send + Sync),
) -> RepositoryError {
    match kind {
        DatabaseErrorKind::UniqueViolation
        | DatabaseErrorKind::ForeignKeyViolation
        | DatabaseErrorKind::NotNullViolation
        | DatabaseErrorKind::CheckViolation => {
            let message = info
                .constraint_name()
                .map_or_else(|| info.message().to_owned(), str::to_owned);
            RepositoryError::record_constraint_violation(message)
        }
        _ if info.message().contains(LOCK_TIMEOUT_MARKER) => {
            RepositoryError::unhandled_exception("row lock wait timed out")
        }
        _ => RepositoryError::unhandled_exception(info.message().to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct StubInfo {
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            self.message
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("todos")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(
        kind: DatabaseErrorKind,
        message: &'static str,
        constraint: Option<&'static str>,
    ) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(StubInfo {
                message,
                constraint,
            }),
        )
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation)]
    #[case(DatabaseErrorKind::ForeignKeyViolation)]
    #[case(DatabaseErrorKind::NotNullViolation)]
    #[case(DatabaseErrorKind::CheckViolation)]
    fn integrity_violations_name_the_constraint(#[case] kind: DatabaseErrorKind) {
        let error = database_error(kind, "violates constraint", Some("todos_name_length"));
        assert_eq!(
            map_diesel_error(error),
            RepositoryError::record_constraint_violation("todos_name_length")
        );
    }

    #[rstest]
    fn integrity_violations_fall_back_to_the_message() {
        let error = database_error(DatabaseErrorKind::CheckViolation, "check failed", None);
        assert_eq!(
            map_diesel_error(error),
            RepositoryError::record_constraint_violation("check failed")
        );
    }

    #[rstest]
    fn lock_timeouts_are_unhandled() {
        let error = database_error(
            DatabaseErrorKind::Unknown,
            "canceling statement due to lock timeout",
            None,
        );
        assert_eq!(
            map_diesel_error(error),
            RepositoryError::unhandled_exception("row lock wait timed out")
        );
    }

    #[rstest]
    #[case(DatabaseErrorKind::ClosedConnection, "server closed the connection")]
    #[case(DatabaseErrorKind::SerializationFailure, "could not serialize access")]
    fn other_database_errors_are_unhandled(
        #[case] kind: DatabaseErrorKind,
        #[case] message: &'static str,
    ) {
        let error = database_error(kind, message, None);
        assert_eq!(
            map_diesel_error(error),
            RepositoryError::unhandled_exception(message)
        );
    }

    #[rstest]
    fn missing_rows_are_not_found() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            RepositoryError::record_not_found()
        );
    }

    #[rstest]
    #[case(PoolError::Timeout)]
    #[case(PoolError::checkout("connection refused"))]
    fn pool_failures_are_unhandled(#[case] error: PoolError) {
        assert!(map_pool_error(error).is_unhandled_exception());
    }
}
