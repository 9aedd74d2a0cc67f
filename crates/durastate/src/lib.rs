//! # durastate
//!
//! Latest-state persistence for actor runtimes. Each persistence ID maps to
//! exactly one stored record holding the most recent state, its version,
//! timestamp and shard; every write replaces it.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use durastate::{CallContext, DurableState, DurableStateStore, TypeRegistry};
//! use durastate::infrastructure::ConfigLoader;
//!
//! let config = ConfigLoader::new().load()?;
//! let registry = TypeRegistry::new().with::<Account>().into_shared();
//! let store = durastate::open_store(&config, registry).await?;
//!
//! let ctx = CallContext::background();
//! store.connect(&ctx).await?;
//! store.write_state(&ctx, &DurableState::new("account_1", 1, account, now, 0)).await?;
//! let latest = store.get_latest_state(&ctx, "account_1").await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - record model, payload codec, error taxonomy, ports
//! - `application` - the [`DurableStore`] facade and conformance suite
//! - `providers` - memory, PostgreSQL, Cassandra and DynamoDB drivers
//! - `infrastructure` - configuration, logging, backend factory, health

use std::sync::Arc;

/// Operator command line
pub mod cli;

/// Domain layer - core types and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use durastate_domain::*;
}

/// Application layer - durable store facade
pub mod application {
    pub use durastate_application::*;
}

/// Backend drivers
pub mod providers {
    pub use durastate_providers::*;
}

/// Infrastructure layer - config, logging, factory and health checks
pub mod infrastructure {
    pub use durastate_infrastructure::*;
}

// Re-export commonly used types at the crate root
pub use application::DurableStore;
pub use domain::*;

use infrastructure::{AppConfig, BackendFactory};

/// Build a [`DurableStore`] over the backend selected by `config`
///
/// The store is returned disconnected; call `connect` (or `ping`) before
/// the first read or write against a session backend.
///
/// # Errors
///
/// Returns a `Configuration` error when the backend settings are rejected.
pub async fn open_store(config: &AppConfig, registry: Arc<TypeRegistry>) -> Result<DurableStore> {
    let backend = BackendFactory::create(&config.backend).await?;
    Ok(DurableStore::new(backend, registry))
}
