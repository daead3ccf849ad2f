// src/db/mod.rs

//! Database access layer.
//!
//! The pipeline needs exactly two operations from PostgreSQL: executing the
//! SQL text produced by raster2pgsql verbatim, and executing the pollution
//! script with four positional string parameters. Both are consolidated in
//! the [`Database`] trait so the import and compute stages are decoupled from
//! `tokio_postgres` and can run against a fake in tests.

use async_trait::async_trait;
use tokio_postgres::types::ToSql;
use tokio_postgres::Client;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::errors::{PipelineError, Result};

#[async_trait]
pub trait Database: Send + Sync {
    /// Execute arbitrary SQL text as one batch (used for staged raster SQL).
    async fn batch_execute(&self, sql: &str) -> Result<()>;

    /// Execute one statement binding string parameters positionally.
    async fn execute_with_params(&self, sql: &str, params: &[&str]) -> Result<()>;
}

#[async_trait]
impl Database for Client {
    async fn batch_execute(&self, sql: &str) -> Result<()> {
        Client::batch_execute(self, sql).await?;
        Ok(())
    }

    async fn execute_with_params(&self, sql: &str, params: &[&str]) -> Result<()> {
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        self.execute(sql, &params).await?;
        Ok(())
    }
}

/// Open the single connection shared by all import and compute steps.
///
/// The connection task is spawned onto the runtime; its eventual shutdown
/// error (if any) is logged, never raised. Dropping the returned client
/// closes the connection best-effort.
pub async fn connect(config: &PipelineConfig) -> Result<Client> {
    info!(url = %config.db_url, "connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(&config.connection_string(), tls)
        .await
        .map_err(PipelineError::Connection)?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            warn!(error = %e, "database connection task ended with error");
        }
    });
    Ok(client)
}
