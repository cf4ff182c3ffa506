//! Async connection pool for Diesel PostgreSQL connections.
//!
//! Wraps `diesel-async`'s `bb8` integration. A transaction owns its pooled
//! connection for its whole lifetime, so checkouts hand out
//! `'static` connections that can move into a repository handle.
//!
//! Connections returned to the pool while still inside a transaction are
//! treated as broken by `diesel-async` and discarded, which is what rolls
//! back work abandoned by a cancelled request.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection, RunError};

/// A checked-out connection owned independently of the pool borrow.
pub type OwnedConnection = PooledConnection<'static, AsyncPgConnection>;

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became free within the checkout timeout.
    #[error("timed out waiting for a pooled connection")]
    Timeout,

    /// Opening or validating a connection failed.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be built.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

impl From<RunError> for PoolError {
    fn from(error: RunError) -> Self {
        match error {
            RunError::TimedOut => Self::Timeout,
            RunError::User(err) => Self::checkout(err.to_string()),
        }
    }
}

/// Configuration for the database connection pool.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use todo_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://todo@localhost/todo")
///     .with_max_size(4)
///     .with_checkout_timeout(Duration::from_secs(2));
/// assert_eq!(config.max_size(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    /// Create a configuration with ten connections and a 30 second
    /// checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            checkout_timeout: Duration::from_secs(30),
        }
    }

    /// Set the maximum number of connections in the pool.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set how long a caller may wait for a free connection.
    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    /// Connection string the pool connects with.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Maximum number of pooled connections.
    #[must_use]
    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Longest wait for a free connection.
    #[must_use]
    pub fn checkout_timeout(&self) -> Duration {
        self.checkout_timeout
    }
}

/// Async connection pool for PostgreSQL via Diesel.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the manager cannot be constructed.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner: pool })
    }

    /// Check out a connection that is not tied to a borrow of the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Timeout`] when the pool stays exhausted for the
    /// configured checkout timeout, or [`PoolError::Checkout`] when a new
    /// connection cannot be opened.
    pub async fn get_owned(&self) -> Result<OwnedConnection, PoolError> {
        self.inner.get_owned().await.map_err(PoolError::from)
    }
}
