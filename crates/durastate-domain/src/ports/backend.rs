//! Backend Driver Port
//!
//! Port for the storage engines behind the store. A driver executes exactly
//! two physical operations, upsert-by-key and point-lookup-by-key, and
//! translates [`DurableStateRecord`] to and from the engine's native format.
//!
//! ## Implementations
//!
//! - **Memory**: in-process map, stateless
//! - **Postgres**: relational table, pooled session
//! - **Cassandra**: wide-column table, driver session
//! - **DynamoDB**: key-value document table, stateless client
//!
//! ## Thread safety
//!
//! Drivers are shared across tasks behind `Arc<dyn StateStoreBackend>`.
//! The store adds no locking around reads and writes; concurrent use is safe
//! because each driver's underlying client (connection pool, session,
//! HTTP client) is itself safe for concurrent use.

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::DurableStateRecord;

/// How a backend manages its connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Connectionless per call; connect/disconnect/ping are no-ops
    Stateless,
    /// Holds a live session opened by `connect` and closed by `disconnect`
    Session,
}

/// Backend Driver Port
///
/// `upsert` writes or wholly replaces the single record for its
/// persistence ID in one atomic operation. `get_by_key` returns `Ok(None)`
/// when no record exists; every other failure is an error. Neither method
/// retries.
#[async_trait]
pub trait StateStoreBackend: Send + Sync + std::fmt::Debug {
    /// Connection model of this backend
    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::Stateless
    }

    /// Open the backend session
    ///
    /// Only called by the facade for [`Lifecycle::Session`] backends, and
    /// only while disconnected.
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    /// Close the backend session
    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }

    /// Write or overwrite the record for `record.persistence_id`
    async fn upsert(&self, record: &DurableStateRecord) -> Result<()>;

    /// Point lookup by persistence ID
    async fn get_by_key(&self, persistence_id: &str) -> Result<Option<DurableStateRecord>>;

    /// Short backend identifier used in errors and logs (e.g. "postgres")
    fn backend_name(&self) -> &str;
}
