//! Backend entry-point: loads settings, prepares the store and serves the
//! todo REST API.

mod server;

use std::net::{SocketAddr, ToSocketAddrs};

use color_eyre::eyre::{Context, OptionExt, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use todo_backend::TodoSettings;
use todo_backend::outbound::persistence::{DbPool, run_pending_migrations};

fn resolve_bind_addr(settings: &TodoSettings) -> Result<SocketAddr> {
    let (host, port) = settings.bind_addr();
    (host.as_str(), port)
        .to_socket_addrs()
        .wrap_err_with(|| format!("failed to resolve bind address {host}:{port}"))?
        .next()
        .ok_or_eyre("bind address resolved to nothing")
}

async fn prepare_database(settings: &TodoSettings) -> Result<Option<DbPool>> {
    let Some(pool_config) = settings.pool_config() else {
        return Ok(None);
    };

    let applied = run_pending_migrations(pool_config.database_url())
        .await
        .wrap_err("failed to run database migrations")?;
    info!(applied, "database migrations complete");

    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = TodoSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load settings")?;
    let bind_addr = resolve_bind_addr(&settings)?;

    let mut config = ServerConfig::new(bind_addr, settings.service_config());
    if let Some(pool) = prepare_database(&settings).await? {
        config = config.with_db_pool(pool);
    }

    info!(addr = %config.bind_addr(), "starting todo server");
    create_server(config)?.await?;
    Ok(())
}
