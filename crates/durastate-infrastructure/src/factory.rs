//! Backend factory
//!
//! Builds the driver named by [`BackendConfig`]'s `provider` tag. This is the
//! only place that knows the concrete driver types; everything above it sees
//! `Arc<dyn StateStoreBackend>`.

use std::sync::Arc;

use durastate_domain::error::Result;
use durastate_domain::ports::StateStoreBackend;
use durastate_providers::{
    CassandraStateBackend, DynamoDbStateBackend, MemoryStateBackend, PostgresStateBackend,
};
use tracing::info;

use crate::config::BackendConfig;
use crate::error_ext::invalid_config;

/// Factory for configured state store backends
pub struct BackendFactory;

impl BackendFactory {
    /// Construct the backend selected by `config`
    ///
    /// No connection is opened; session backends are returned disconnected.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when the driver rejects its settings.
    pub async fn create(config: &BackendConfig) -> Result<Arc<dyn StateStoreBackend>> {
        let backend: Arc<dyn StateStoreBackend> = match config {
            BackendConfig::Memory => Arc::new(MemoryStateBackend::new()),
            BackendConfig::Postgres(postgres) => Arc::new(
                PostgresStateBackend::new(postgres.to_options())
                    .map_err(|e| invalid_config("backend", e))?,
            ),
            BackendConfig::Cassandra(cassandra) => Arc::new(
                CassandraStateBackend::new(cassandra.to_options())
                    .map_err(|e| invalid_config("backend", e))?,
            ),
            BackendConfig::DynamoDb(dynamodb) => Arc::new(
                DynamoDbStateBackend::from_options(dynamodb.to_options())
                    .await
                    .map_err(|e| invalid_config("backend", e))?,
            ),
        };
        info!(provider = config.provider(), "state store backend created");
        Ok(backend)
    }
}
