//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `TODO_*` environment variables or a config
//! file. Every field is optional; accessors fall back to the defaults below.

use std::num::NonZeroU32;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::TodoServiceConfig;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_CHECKOUT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 5;
const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::MIN.saturating_add(19);

/// Configuration values for the todo service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TODO")]
pub struct TodoSettings {
    /// PostgreSQL connection string; without one todos live in memory.
    pub database_url: Option<String>,
    /// Interface the HTTP server binds to.
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Seconds a request may wait for a pooled connection.
    pub pool_checkout_timeout_secs: Option<u64>,
    /// Seconds an update may wait for a row lock.
    pub lock_timeout_secs: Option<u64>,
    /// Page size used when a list request names none.
    pub default_page_size: Option<u32>,
}

impl TodoSettings {
    /// Return the database URL, treating a blank value as absent.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the `(host, port)` pair for the HTTP listener.
    pub fn bind_addr(&self) -> (String, u16) {
        (
            self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Pool configuration for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url().map(|url| {
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE).max(1))
                .with_checkout_timeout(Duration::from_secs(
                    self.pool_checkout_timeout_secs
                        .unwrap_or(DEFAULT_POOL_CHECKOUT_TIMEOUT_SECS),
                ))
        })
    }

    /// Service tunables; a zero page size falls back to the default.
    pub fn service_config(&self) -> TodoServiceConfig {
        let page_size = self
            .default_page_size
            .and_then(NonZeroU32::new)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        TodoServiceConfig::default()
            .with_default_page_size(page_size)
            .with_lock_timeout(Duration::from_secs(
                self.lock_timeout_secs.unwrap_or(DEFAULT_LOCK_TIMEOUT_SECS),
            ))
    }
}
