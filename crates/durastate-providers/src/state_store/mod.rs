//! State Store Backend Implementations
//!
//! ## Available Backends
//!
//! | Backend | Lifecycle | Engine |
//! |---------|-----------|--------|
//! | [`MemoryStateBackend`] | Stateless | In-process map |
//! | [`PostgresStateBackend`] | Session | PostgreSQL, native `ON CONFLICT` upsert |
//! | [`CassandraStateBackend`] | Session | Cassandra / ScyllaDB, tunable consistency |
//! | [`DynamoDbStateBackend`] | Stateless | DynamoDB `PutItem` / `GetItem` |
//!
//! Every backend satisfies the `StateStoreBackend` port. None of them
//! retries; failures surface on the first attempt.

#[cfg(feature = "backend-cassandra")]
pub mod cassandra;
#[cfg(feature = "backend-dynamodb")]
pub mod dynamodb;
#[cfg(feature = "backend-memory")]
pub mod memory;
#[cfg(feature = "backend-postgres")]
pub mod postgres;

#[cfg(feature = "backend-cassandra")]
pub use cassandra::{CassandraOptions, CassandraStateBackend, ConsistencyLevel};
#[cfg(feature = "backend-dynamodb")]
pub use dynamodb::{DynamoDbOptions, DynamoDbStateBackend, StaticCredentials};
#[cfg(feature = "backend-memory")]
pub use memory::MemoryStateBackend;
#[cfg(feature = "backend-postgres")]
pub use postgres::{PostgresOptions, PostgresStateBackend};
