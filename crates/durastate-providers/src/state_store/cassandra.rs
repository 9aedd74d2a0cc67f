//! Cassandra / ScyllaDB state store backend
//!
//! Table `states_store` with `persistence_id` as the sole partition key and
//! no clustering key, so every `INSERT` overwrites the previous row:
//!
//! ```cql
//! CREATE TABLE IF NOT EXISTS states_store (
//!     persistence_id text PRIMARY KEY,
//!     version_number bigint,
//!     state_payload  blob,
//!     state_manifest text,
//!     timestamp      bigint,
//!     shard_number   bigint
//! );
//! ```
//!
//! ## Consistency
//!
//! Both statements run at the configured [`ConsistencyLevel`]. Pick a level
//! whose read and write replica sets overlap (e.g. `quorum` for both) when a
//! read must observe the previous write.
//!
//! ## Session
//!
//! `connect` builds a driver session and prepares both statements; the
//! session is dropped on `disconnect`.

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
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::statement::Consistency;
use scylla::statement::prepared::PreparedStatement;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{
    BACKEND_CASSANDRA, CASSANDRA_DEFAULT_CONNECT_TIMEOUT_SECS, CASSANDRA_DEFAULT_PORT,
};
use crate::utils::{from_bigint, to_bigint, validate_table_identifier};

/// Row shape returned by the select statement
type StateRow = (String, i64, Vec<u8>, String, i64, i64);

/// Consistency level for reads and writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    #[default]
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    LocalOne,
}

impl From<ConsistencyLevel> for Consistency {
    fn from(level: ConsistencyLevel) -> Self {
        match level {
            ConsistencyLevel::Any => Consistency::Any,
            ConsistencyLevel::One => Consistency::One,
            ConsistencyLevel::Two => Consistency::Two,
            ConsistencyLevel::Three => Consistency::Three,
            ConsistencyLevel::Quorum => Consistency::Quorum,
            ConsistencyLevel::All => Consistency::All,
            ConsistencyLevel::LocalQuorum => Consistency::LocalQuorum,
            ConsistencyLevel::EachQuorum => Consistency::EachQuorum,
            ConsistencyLevel::LocalOne => Consistency::LocalOne,
        }
    }
}

/// Connection settings for [`CassandraStateBackend`]
#[derive(Debug, Clone)]
pub struct CassandraOptions {
    /// `host` or `host:port` entries
    pub contact_points: Vec<String>,
    /// Keyspace holding the table
    pub keyspace: String,
    /// Table name within the keyspace
    pub table: String,
    /// Consistency level for reads and writes
    pub consistency: ConsistencyLevel,
    /// Login user; authentication is off when unset
    pub username: Option<String>,
    /// Login password, required with `username`
    pub password: Option<String>,
    /// Timeout for establishing the session
    pub connect_timeout: Duration,
}

impl Default for CassandraOptions {
    fn default() -> Self {
        Self {
            contact_points: vec![format!("127.0.0.1:{CASSANDRA_DEFAULT_PORT}")],
            keyspace: "durastate".to_string(),
            table: DEFAULT_STATES_TABLE.to_string(),
            consistency: ConsistencyLevel::default(),
            username: None,
            password: None,
            connect_timeout: Duration::from_secs(CASSANDRA_DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

struct CassandraSession {
    session: Session,
    insert: PreparedStatement,
    select: PreparedStatement,
}

/// Cassandra / ScyllaDB backend driver
pub struct CassandraStateBackend {
    options: CassandraOptions,
    session: ArcSwapOption<CassandraSession>,
}

impl CassandraStateBackend {
    /// Create a disconnected backend
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty contact point list or an
    /// invalid keyspace or table identifier.
    pub fn new(options: CassandraOptions) -> Result<Self> {
        if options.contact_points.is_empty() {
            return Err(Error::invalid_argument(
                "cassandra contact_points cannot be empty",
            ));
        }
        validate_table_identifier(&options.keyspace)?;
        validate_table_identifier(&options.table)?;
        Ok(Self {
            options,
            session: ArcSwapOption::empty(),
        })
    }

    /// Configured consistency level
    pub fn consistency(&self) -> ConsistencyLevel {
        self.options.consistency
    }

    fn session(&self) -> Result<Arc<CassandraSession>> {
        self.session
            .load_full()
            .ok_or_else(|| Error::not_connected(BACKEND_CASSANDRA))
    }

    async fn prepare(&self, session: &Session, cql: String) -> Result<PreparedStatement> {
        let mut statement = session.prepare(cql).await.map_err(|e| {
            Error::connection_with_source(BACKEND_CASSANDRA, "failed to prepare statement", e)
        })?;
        statement.set_consistency(self.options.consistency.into());
        Ok(statement)
    }
}

impl std::fmt::Debug for CassandraStateBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CassandraStateBackend")
            .field("contact_points", &self.options.contact_points)
            .field("keyspace", &self.options.keyspace)
            .field("table", &self.options.table)
            .field("consistency", &self.options.consistency)
            .field("connected", &self.session.load().is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StateStoreBackend for CassandraStateBackend {
    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::Session
    }

    async fn connect(&self) -> Result<()> {
        let options = &self.options;
        let mut builder = SessionBuilder::new()
            .known_nodes(&options.contact_points)
            .connection_timeout(options.connect_timeout)
            .use_keyspace(&options.keyspace, false);
        if let (Some(user), Some(password)) = (&options.username, &options.password) {
            builder = builder.user(user, password);
        }

        let session = builder.build().await.map_err(|e| {
            Error::connection_with_source(
                BACKEND_CASSANDRA,
                format!("failed to connect to {:?}", options.contact_points),
                e,
            )
        })?;
        let insert = self.prepare(&session, insert_statement(&options.table)).await?;
        let select = self.prepare(&session, select_statement(&options.table)).await?;

        self.session.store(Some(Arc::new(CassandraSession {
            session,
            insert,
            select,
        })));
        info!(
            keyspace = %options.keyspace,
            table = %options.table,
            consistency = ?options.consistency,
            "cassandra session opened"
        );
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        if self.session.swap(None).is_some() {
            info!(keyspace = %self.options.keyspace, "cassandra session closed");
        }
        Ok(())
    }

    async fn upsert(&self, record: &DurableStateRecord) -> Result<()> {
        let pid = record.persistence_id.as_str();
        let version =
            to_bigint(BACKEND_CASSANDRA, pid, COLUMN_VERSION_NUMBER, record.version_number)?;
        let shard = to_bigint(BACKEND_CASSANDRA, pid, COLUMN_SHARD_NUMBER, record.shard_number)?;
        let current = self.session()?;

        current
            .session
            .execute_unpaged(
                &current.insert,
                (
                    pid,
                    version,
                    record.state_payload.as_slice(),
                    record.state_manifest.as_str(),
                    record.timestamp,
                    shard,
                ),
            )
            .await
            .map_err(|e| Error::backend_write_with_source(BACKEND_CASSANDRA, pid, "insert failed", e))?;

        debug!(persistence_id = pid, "cassandra upsert");
        Ok(())
    }

    async fn get_by_key(&self, persistence_id: &str) -> Result<Option<DurableStateRecord>> {
        let current = self.session()?;

        let result = current
            .session
            .execute_unpaged(&current.select, (persistence_id,))
            .await
            .map_err(|e| {
                Error::backend_read_with_source(BACKEND_CASSANDRA, persistence_id, "select failed", e)
            })?;
        let rows = result.into_rows_result().map_err(|e| {
            Error::backend_read_with_source(BACKEND_CASSANDRA, persistence_id, "expected rows", e)
        })?;
        let row = rows.maybe_first_row::<StateRow>().map_err(|e| {
            Error::backend_read_with_source(BACKEND_CASSANDRA, persistence_id, "malformed row", e)
        })?;

        row.map(|row| row_to_record(persistence_id, row)).transpose()
    }

    fn backend_name(&self) -> &str {
        BACKEND_CASSANDRA
    }
}

fn row_to_record(persistence_id: &str, row: StateRow) -> Result<DurableStateRecord> {
    let (stored_id, version, payload, manifest, timestamp, shard) = row;
    Ok(DurableStateRecord {
        persistence_id: stored_id,
        version_number: from_bigint(BACKEND_CASSANDRA, persistence_id, COLUMN_VERSION_NUMBER, version)?,
        state_payload: payload,
        state_manifest: manifest,
        timestamp,
        shard_number: from_bigint(BACKEND_CASSANDRA, persistence_id, COLUMN_SHARD_NUMBER, shard)?,
    })
}

fn insert_statement(table: &str) -> String {
    format!(
        "INSERT INTO {table} \
         ({COLUMN_PERSISTENCE_ID}, {COLUMN_VERSION_NUMBER}, {COLUMN_STATE_PAYLOAD}, \
         {COLUMN_STATE_MANIFEST}, {COLUMN_TIMESTAMP}, {COLUMN_SHARD_NUMBER}) \
         VALUES (?, ?, ?, ?, ?, ?)"
    )
}

fn select_statement(table: &str) -> String {
    format!(
        "SELECT {COLUMN_PERSISTENCE_ID}, {COLUMN_VERSION_NUMBER}, {COLUMN_STATE_PAYLOAD}, \
         {COLUMN_STATE_MANIFEST}, {COLUMN_TIMESTAMP}, {COLUMN_SHARD_NUMBER} \
         FROM {table} WHERE {COLUMN_PERSISTENCE_ID} = ?"
    )
}
