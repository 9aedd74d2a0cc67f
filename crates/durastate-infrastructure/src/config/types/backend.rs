//! Backend configuration types
//!
//! The `provider` tag selects the driver; the remaining keys of the
//! `[backend]` table are that driver's settings.
//!
//! ```toml
//! [backend]
//! provider = "cassandra"
//! contact_points = ["10.0.0.1:9042", "10.0.0.2:9042"]
//! keyspace = "actors"
//! consistency = "local_quorum"
//! ```

use std::time::Duration;

use durastate_domain::constants::DEFAULT_STATES_TABLE;
use durastate_providers::constants::{
    BACKEND_CASSANDRA, BACKEND_DYNAMODB, BACKEND_MEMORY, BACKEND_POSTGRES,
    CASSANDRA_DEFAULT_CONNECT_TIMEOUT_SECS, CASSANDRA_DEFAULT_PORT, DYNAMODB_DEFAULT_REGION,
    POSTGRES_DEFAULT_CONNECT_TIMEOUT_SECS, POSTGRES_DEFAULT_MAX_CONNECTIONS,
    POSTGRES_DEFAULT_PORT,
};
use durastate_providers::{
    CassandraOptions, ConsistencyLevel, DynamoDbOptions, PostgresOptions, StaticCredentials,
};
use serde::{Deserialize, Serialize};

/// Storage backend selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-process map; state is lost on exit
    #[default]
    Memory,
    /// PostgreSQL table
    Postgres(PostgresConfig),
    /// Cassandra or ScyllaDB table
    Cassandra(CassandraConfig),
    /// DynamoDB table
    DynamoDb(DynamoDbConfig),
}

impl BackendConfig {
    /// Name of the selected driver
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Memory => BACKEND_MEMORY,
            Self::Postgres(_) => BACKEND_POSTGRES,
            Self::Cassandra(_) => BACKEND_CASSANDRA,
            Self::DynamoDb(_) => BACKEND_DYNAMODB,
        }
    }
}

/// PostgreSQL settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Schema qualifying the table; the connection's search path when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lifetime_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout_secs: Option<u64>,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: POSTGRES_DEFAULT_PORT,
            database: "postgres".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            schema: None,
            table: DEFAULT_STATES_TABLE.to_string(),
            max_connections: POSTGRES_DEFAULT_MAX_CONNECTIONS,
            min_connections: 0,
            connect_timeout_secs: POSTGRES_DEFAULT_CONNECT_TIMEOUT_SECS,
            max_lifetime_secs: None,
            idle_timeout_secs: None,
        }
    }
}

impl PostgresConfig {
    /// Table name as spliced into statements
    pub fn qualified_table(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.table),
            None => self.table.clone(),
        }
    }

    /// Driver options for these settings
    pub fn to_options(&self) -> PostgresOptions {
        PostgresOptions {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            table: self.qualified_table(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_lifetime: self.max_lifetime_secs.map(Duration::from_secs),
            idle_timeout: self.idle_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Cassandra / ScyllaDB settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CassandraConfig {
    /// `host` or `host:port` entries
    pub contact_points: Vec<String>,
    pub keyspace: String,
    pub table: String,
    /// Applied to every read and write
    pub consistency: ConsistencyLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub connect_timeout_secs: u64,
}

impl Default for CassandraConfig {
    fn default() -> Self {
        Self {
            contact_points: vec![format!("127.0.0.1:{CASSANDRA_DEFAULT_PORT}")],
            keyspace: "durastate".to_string(),
            table: DEFAULT_STATES_TABLE.to_string(),
            consistency: ConsistencyLevel::default(),
            username: None,
            password: None,
            connect_timeout_secs: CASSANDRA_DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl CassandraConfig {
    /// Driver options for these settings
    pub fn to_options(&self) -> CassandraOptions {
        CassandraOptions {
            contact_points: self.contact_points.clone(),
            keyspace: self.keyspace.clone(),
            table: self.table.clone(),
            consistency: self.consistency,
            username: self.username.clone(),
            password: self.password.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

/// DynamoDB settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamoDbConfig {
    pub table: String,
    pub region: String,
    /// Endpoint override for DynamoDB Local and other emulators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Static credentials; the default AWS provider chain when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<DynamoDbCredentialsConfig>,
    /// Strongly consistent reads
    pub consistent_read: bool,
}

impl Default for DynamoDbConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_STATES_TABLE.to_string(),
            region: DYNAMODB_DEFAULT_REGION.to_string(),
            endpoint_url: None,
            credentials: None,
            consistent_read: false,
        }
    }
}

impl DynamoDbConfig {
    /// Driver options for these settings
    pub fn to_options(&self) -> DynamoDbOptions {
        DynamoDbOptions {
            table: self.table.clone(),
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            credentials: self.credentials.as_ref().map(|c| StaticCredentials {
                access_key_id: c.access_key_id.clone(),
                secret_access_key: c.secret_access_key.clone(),
                session_token: c.session_token.clone(),
            }),
            consistent_read: self.consistent_read,
        }
    }
}

/// Static AWS credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamoDbCredentialsConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl std::fmt::Debug for DynamoDbCredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbCredentialsConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
