//! Store-level failure taxonomy and result combinators.
//!
//! Adapters classify raw store failures into [`RepositoryError`] at the point
//! of failure. Everything above the repository speaks only this vocabulary,
//! so services can branch on "not found" versus "constraint" versus
//! "anything else" without knowing which store produced the error.

use super::define_port_error;

define_port_error! {
    /// Expected failure kinds reported by todo repositories.
    pub enum RepositoryError {
        /// No row matched the lookup or mutation.
        RecordNotFound => "record not found",
        /// The store rejected a write that violated an integrity constraint.
        RecordConstraintViolation { message: String } =>
            "record constraint violated: {message}",
        /// Any other store failure: connectivity, lock timeouts, bugs.
        UnhandledException { message: String } =>
            "unhandled repository failure: {message}",
    }
}

/// Result alias used by every repository operation.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Interpret an affected-row count from a single-row mutation.
///
/// Zero rows means the target was absent. More than one row means the
/// mutation matched something it should not have, which is reported as an
/// unhandled failure rather than silently accepted.
///
/// # Examples
/// ```
/// use todo_backend::domain::ports::{expect_one, RepositoryError};
///
/// assert_eq!(expect_one(1), Ok(()));
/// assert_eq!(expect_one(0), Err(RepositoryError::RecordNotFound));
/// assert!(expect_one(2).is_err());
/// ```
pub fn expect_one(affected: usize) -> RepositoryResult<()> {
    match affected {
        0 => Err(RepositoryError::record_not_found()),
        1 => Ok(()),
        n => Err(RepositoryError::unhandled_exception(format!(
            "expected exactly one affected row, got {n}"
        ))),
    }
}

/// Apply [`expect_one`] to a fallible affected-row count.
pub trait AffectedRowsExt {
    /// Require exactly one affected row.
    fn expect_one(self) -> RepositoryResult<()>;
}

impl AffectedRowsExt for RepositoryResult<usize> {
    fn expect_one(self) -> RepositoryResult<()> {
        self.and_then(expect_one)
    }
}

/// Turn an optional lookup into a not-found failure.
pub trait OptionalRecordExt<T> {
    /// `Ok(None)` becomes [`RepositoryError::RecordNotFound`].
    fn or_not_found(self) -> RepositoryResult<T>;
}

impl<T> OptionalRecordExt<T> for RepositoryResult<Option<T>> {
    fn or_not_found(self) -> RepositoryResult<T> {
        self.and_then(|record| record.ok_or_else(RepositoryError::record_not_found))
    }
}

/// Soften not-found failures where absence is acceptable.
pub trait RecordExt<T> {
    /// [`RepositoryError::RecordNotFound`] becomes `Ok(None)`.
    fn none_if_not_found(self) -> RepositoryResult<Option<T>>;
}

impl<T> RecordExt<T> for RepositoryResult<T> {
    fn none_if_not_found(self) -> RepositoryResult<Option<T>> {
        match self {
            Ok(record) => Ok(Some(record)),
            Err(RepositoryError::RecordNotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Treat a missing target as success for idempotent mutations.
pub trait IgnoreNotFoundExt {
    /// [`RepositoryError::RecordNotFound`] becomes `Ok(())`.
    fn ignore_not_found(self) -> RepositoryResult<()>;
}

impl IgnoreNotFoundExt for RepositoryResult<()> {
    fn ignore_not_found(self) -> RepositoryResult<()> {
        self.none_if_not_found().map(|_| ())
    }
}
