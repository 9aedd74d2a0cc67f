//! Domain Port Interfaces
//!
//! | Port | Description |
//! |------|-------------|
//! | [`StateStoreBackend`] | Backend driver: upsert and point lookup |
//! | [`DurableStateStore`] | Public store contract used by the runtime |

/// Backend driver port
pub mod backend;
/// Durable state store port
pub mod store;

pub use backend::{Lifecycle, StateStoreBackend};
pub use store::DurableStateStore;
