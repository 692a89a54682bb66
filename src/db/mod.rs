pub mod executor;
pub mod schema;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

pub use executor::{execute, Fetch, Fetched, SqlParam};

/// Bounded pool; `acquire` fails with `PoolTimedOut` once every connection is
/// checked out for longer than the configured timeout.
pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.pool_size)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}
