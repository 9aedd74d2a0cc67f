//! DynamoDB state store backend
//!
//! One item per persistence ID, partition key `PersistenceID` (string).
//! `PutItem` replaces the whole item, so a write is an atomic upsert;
//! `GetItem` is the point lookup. See [`item`] for the attribute layout.
//!
//! The SDK client is connectionless, so the backend is
//! [`Lifecycle::Stateless`]. Reads are eventually consistent unless
//! `consistent_read` is set.

pub mod item;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::error::DisplayErrorContext;
use durastate_domain::constants::DEFAULT_STATES_TABLE;
use durastate_domain::error::{Error, Result};
use durastate_domain::ports::{Lifecycle, StateStoreBackend};
use durastate_domain::value_objects::DurableStateRecord;
use tracing::{debug, info};

use crate::constants::{
    BACKEND_DYNAMODB, DYNAMODB_DEFAULT_REGION, DYNAMODB_STATIC_CREDENTIALS_PROVIDER,
};

/// Static credentials, for local emulators and tests
#[derive(Clone)]
pub struct StaticCredentials {
    /// AWS access key ID
    pub access_key_id: String,
    /// AWS secret access key
    pub secret_access_key: String,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

/// Client settings for [`DynamoDbStateBackend`]
#[derive(Debug, Clone)]
pub struct DynamoDbOptions {
    /// Table name
    pub table: String,
    /// AWS region
    pub region: String,
    /// Endpoint override, e.g. `http://localhost:8000` for DynamoDB Local
    pub endpoint_url: Option<String>,
    /// Credentials; the default provider chain is used when unset
    pub credentials: Option<StaticCredentials>,
    /// Strongly consistent `GetItem`
    pub consistent_read: bool,
}

impl Default for DynamoDbOptions {
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

/// DynamoDB backend driver
#[derive(Debug, Clone)]
pub struct DynamoDbStateBackend {
    client: Client,
    table: String,
    consistent_read: bool,
}

impl DynamoDbStateBackend {
    /// Wrap an existing SDK client
    pub fn new(client: Client, table: impl Into<String>, consistent_read: bool) -> Self {
        Self {
            client,
            table: table.into(),
            consistent_read,
        }
    }

    /// Build the SDK client from `options`
    ///
    /// Resolves credentials and region; no request is sent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the table name is empty.
    pub async fn from_options(options: DynamoDbOptions) -> Result<Self> {
        if options.table.is_empty() {
            return Err(Error::invalid_argument("dynamodb table cannot be empty"));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(options.region.clone()));
        if let Some(endpoint) = &options.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        if let Some(credentials) = options.credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key_id,
                credentials.secret_access_key,
                credentials.session_token,
                None,
                DYNAMODB_STATIC_CREDENTIALS_PROVIDER,
            ));
        }
        let sdk_config = loader.load().await;

        info!(
            table = %options.table,
            region = %options.region,
            endpoint = options.endpoint_url.as_deref().unwrap_or("default"),
            "dynamodb client ready"
        );
        Ok(Self::new(
            Client::new(&sdk_config),
            options.table,
            options.consistent_read,
        ))
    }

    /// Table the backend reads and writes
    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl StateStoreBackend for DynamoDbStateBackend {
    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::Stateless
    }

    async fn upsert(&self, record: &DurableStateRecord) -> Result<()> {
        let pid = record.persistence_id.as_str();

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(item::record_to_item(record)))
            .send()
            .await
            .map_err(|e| {
                Error::backend_write_with_source(
                    BACKEND_DYNAMODB,
                    pid,
                    format!("PutItem failed: {}", DisplayErrorContext(&e)),
                    e.into_service_error(),
                )
            })?;

        debug!(persistence_id = pid, "dynamodb put item");
        Ok(())
    }

    async fn get_by_key(&self, persistence_id: &str) -> Result<Option<DurableStateRecord>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .set_key(Some(item::key_for(persistence_id)))
            .consistent_read(self.consistent_read)
            .send()
            .await
            .map_err(|e| {
                Error::backend_read_with_source(
                    BACKEND_DYNAMODB,
                    persistence_id,
                    format!("GetItem failed: {}", DisplayErrorContext(&e)),
                    e.into_service_error(),
                )
            })?;

        output
            .item()
            .map(|item| item::item_to_record(persistence_id, item))
            .transpose()
    }

    fn backend_name(&self) -> &str {
        BACKEND_DYNAMODB
    }
}
