//! PostgreSQL state store backend
//!
//! One row per persistence ID in a fixed-schema table:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS states_store (
//!     persistence_id VARCHAR(255) PRIMARY KEY,
//!     version_number BIGINT NOT NULL,
//!     state_payload  BYTEA NOT NULL,
//!     state_manifest VARCHAR(255) NOT NULL,
//!     timestamp      BIGINT NOT NULL,
//!     shard_number   BIGINT NOT NULL
//! );
//! ```
//!
//! ## Upsert
//!
//! A single `INSERT ... ON CONFLICT (persistence_id) DO UPDATE` statement.
//! The row is replaced atomically; concurrent writers to one key serialise
//! on the row lock and the last one to commit wins.
//!
//! ## Session
//!
//! `connect` opens a `sqlx` pool and `disconnect` closes it. The pool is
//! held in a lock-free slot, so reads and writes never wait on lifecycle
//! calls; a call made with no pool fails with a connection error.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use durastate_domain::constants::{
    COLUMN_PERSISTENCE_ID, COLUMN_SHARD_NUMBER, COLUMN_STATE_MANIFEST, COLUMN_STATE_PAYLOAD,
    COLUMN_TIMESTAMP, COLUMN_VERSION_NUMBER, DEFAULT_STATES_TABLE,
};
use durastate_domain::error::{Error, Result};
use durastate_domain::ports::{Lifecycle, StateStoreBackend};
use durastate_domain::value_objects::DurableStateRecord;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::constants::{
    BACKEND_POSTGRES, POSTGRES_DEFAULT_CONNECT_TIMEOUT_SECS, POSTGRES_DEFAULT_MAX_CONNECTIONS,
    POSTGRES_DEFAULT_PORT,
};
use crate::utils::{from_bigint, to_bigint, validate_qualified_identifier};

/// Connection settings for [`PostgresStateBackend`]
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database name
    pub database: String,
    /// Login role
    pub user: String,
    /// Login password
    pub password: String,
    /// Table name, optionally `schema.table`
    pub table: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
    /// Idle connections the pool keeps open
    pub min_connections: u32,
    /// Timeout for opening or acquiring a connection
    pub connect_timeout: Duration,
    /// Close connections older than this
    pub max_lifetime: Option<Duration>,
    /// Close connections idle longer than this
    pub idle_timeout: Option<Duration>,
}

impl Default for PostgresOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: POSTGRES_DEFAULT_PORT,
            database: "postgres".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            table: DEFAULT_STATES_TABLE.to_string(),
            max_connections: POSTGRES_DEFAULT_MAX_CONNECTIONS,
            min_connections: 0,
            connect_timeout: Duration::from_secs(POSTGRES_DEFAULT_CONNECT_TIMEOUT_SECS),
            max_lifetime: None,
            idle_timeout: None,
        }
    }
}

/// PostgreSQL backend driver
pub struct PostgresStateBackend {
    options: PostgresOptions,
    pool: ArcSwapOption<PgPool>,
    upsert_sql: String,
    select_sql: String,
}

impl PostgresStateBackend {
    /// Create a disconnected backend
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the table name is not a plain
    /// (optionally schema-qualified) identifier.
    pub fn new(options: PostgresOptions) -> Result<Self> {
        validate_qualified_identifier(&options.table)?;
        let upsert_sql = upsert_statement(&options.table);
        let select_sql = select_statement(&options.table);
        Ok(Self {
            options,
            pool: ArcSwapOption::empty(),
            upsert_sql,
            select_sql,
        })
    }

    /// Table the backend reads and writes
    pub fn table(&self) -> &str {
        &self.options.table
    }

    fn pool(&self) -> Result<Arc<PgPool>> {
        self.pool
            .load_full()
            .ok_or_else(|| Error::not_connected(BACKEND_POSTGRES))
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.options.host)
            .port(self.options.port)
            .database(&self.options.database)
            .username(&self.options.user)
            .password(&self.options.password)
    }
}

impl std::fmt::Debug for PostgresStateBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStateBackend")
            .field("host", &self.options.host)
            .field("port", &self.options.port)
            .field("database", &self.options.database)
            .field("table", &self.options.table)
            .field("connected", &self.pool.load().is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StateStoreBackend for PostgresStateBackend {
    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::Session
    }

    async fn connect(&self) -> Result<()> {
        let options = &self.options;
        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .min_connections(options.min_connections)
            .acquire_timeout(options.connect_timeout)
            .max_lifetime(options.max_lifetime)
            .idle_timeout(options.idle_timeout)
            .connect_with(self.connect_options())
            .await
            .map_err(|e| {
                Error::connection_with_source(
                    BACKEND_POSTGRES,
                    format!(
                        "failed to connect to {}:{}/{}",
                        options.host, options.port, options.database
                    ),
                    e,
                )
            })?;

        if let Some(previous) = self.pool.swap(Some(Arc::new(pool))) {
            previous.close().await;
        }
        info!(
            host = %options.host,
            database = %options.database,
            table = %options.table,
            "postgres pool opened"
        );
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        if let Some(pool) = self.pool.swap(None) {
            pool.close().await;
            info!(host = %self.options.host, "postgres pool closed");
        }
        Ok(())
    }

    async fn upsert(&self, record: &DurableStateRecord) -> Result<()> {
        let pid = record.persistence_id.as_str();
        let version = to_bigint(BACKEND_POSTGRES, pid, COLUMN_VERSION_NUMBER, record.version_number)?;
        let shard = to_bigint(BACKEND_POSTGRES, pid, COLUMN_SHARD_NUMBER, record.shard_number)?;
        let pool = self.pool()?;

        sqlx::query(&self.upsert_sql)
            .bind(pid)
            .bind(version)
            .bind(record.state_payload.as_slice())
            .bind(record.state_manifest.as_str())
            .bind(record.timestamp)
            .bind(shard)
            .execute(pool.as_ref())
            .await
            .map_err(|e| Error::backend_write_with_source(BACKEND_POSTGRES, pid, "upsert failed", e))?;

        debug!(persistence_id = pid, "postgres upsert");
        Ok(())
    }

    async fn get_by_key(&self, persistence_id: &str) -> Result<Option<DurableStateRecord>> {
        let pool = self.pool()?;

        let row = sqlx::query(&self.select_sql)
            .bind(persistence_id)
            .fetch_optional(pool.as_ref())
            .await
            .map_err(|e| {
                Error::backend_read_with_source(BACKEND_POSTGRES, persistence_id, "select failed", e)
            })?;

        row.as_ref()
            .map(|row| row_to_record(persistence_id, row))
            .transpose()
    }

    fn backend_name(&self) -> &str {
        BACKEND_POSTGRES
    }
}

fn row_to_record(persistence_id: &str, row: &PgRow) -> Result<DurableStateRecord> {
    let column = |e: sqlx::Error| {
        Error::backend_read_with_source(BACKEND_POSTGRES, persistence_id, "malformed row", e)
    };

    let version: i64 = row.try_get(COLUMN_VERSION_NUMBER).map_err(column)?;
    let shard: i64 = row.try_get(COLUMN_SHARD_NUMBER).map_err(column)?;

    Ok(DurableStateRecord {
        persistence_id: row.try_get(COLUMN_PERSISTENCE_ID).map_err(column)?,
        version_number: from_bigint(BACKEND_POSTGRES, persistence_id, COLUMN_VERSION_NUMBER, version)?,
        state_payload: row.try_get(COLUMN_STATE_PAYLOAD).map_err(column)?,
        state_manifest: row.try_get(COLUMN_STATE_MANIFEST).map_err(column)?,
        timestamp: row.try_get(COLUMN_TIMESTAMP).map_err(column)?,
        shard_number: from_bigint(BACKEND_POSTGRES, persistence_id, COLUMN_SHARD_NUMBER, shard)?,
    })
}

fn upsert_statement(table: &str) -> String {
    format!(
        "INSERT INTO {table} \
         ({COLUMN_PERSISTENCE_ID}, {COLUMN_VERSION_NUMBER}, {COLUMN_STATE_PAYLOAD}, \
         {COLUMN_STATE_MANIFEST}, {COLUMN_TIMESTAMP}, {COLUMN_SHARD_NUMBER}) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT ({COLUMN_PERSISTENCE_ID}) DO UPDATE SET \
         {COLUMN_VERSION_NUMBER} = EXCLUDED.{COLUMN_VERSION_NUMBER}, \
         {COLUMN_STATE_PAYLOAD} = EXCLUDED.{COLUMN_STATE_PAYLOAD}, \
         {COLUMN_STATE_MANIFEST} = EXCLUDED.{COLUMN_STATE_MANIFEST}, \
         {COLUMN_TIMESTAMP} = EXCLUDED.{COLUMN_TIMESTAMP}, \
         {COLUMN_SHARD_NUMBER} = EXCLUDED.{COLUMN_SHARD_NUMBER}"
    )
}

fn select_statement(table: &str) -> String {
    format!(
        "SELECT {COLUMN_PERSISTENCE_ID}, {COLUMN_VERSION_NUMBER}, {COLUMN_STATE_PAYLOAD}, \
         {COLUMN_STATE_MANIFEST}, {COLUMN_TIMESTAMP}, {COLUMN_SHARD_NUMBER} \
         FROM {table} WHERE {COLUMN_PERSISTENCE_ID} = $1"
    )
}
