//! # durastate - Backend Drivers
//!
//! Storage engine implementations of the `StateStoreBackend` port defined
//! in `durastate-domain`. Each driver translates the backend-neutral
//! `DurableStateRecord` to and from its engine's native format and executes
//! exactly two physical operations: upsert-by-key and point lookup.
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! durastate-providers = { version = "0.1", default-features = false, features = ["backend-postgres"] }
//! ```
//!
//! | Feature | Backend |
//! |---------|---------|
//! | `backend-memory` (default) | In-memory map |
//! | `backend-postgres` | PostgreSQL via `sqlx` |
//! | `backend-cassandra` | Cassandra / ScyllaDB via `scylla` |
//! | `backend-dynamodb` | DynamoDB via `aws-sdk-dynamodb` |
//!
//! ## Thread safety
//!
//! Drivers add no locking of their own around reads and writes. They are
//! safe to share because the pool, session and SDK client they wrap are.

pub use durastate_domain::error::{Error, Result};
pub use durastate_domain::ports::{Lifecycle, StateStoreBackend};

/// Provider-specific constants
pub mod constants;

/// State store backend implementations
pub mod state_store;

/// Shared utilities for backend drivers
pub mod utils;

pub use state_store::*;
