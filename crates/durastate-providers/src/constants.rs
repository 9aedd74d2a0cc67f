//! Provider Constants
//!
//! Backend identifiers and connection defaults. Persisted table and column
//! names live in `durastate_domain::constants`.

// ============================================================================
// BACKEND NAMES
// ============================================================================

/// In-memory backend name
pub const BACKEND_MEMORY: &str = "memory";

/// PostgreSQL backend name
pub const BACKEND_POSTGRES: &str = "postgres";

/// Cassandra / ScyllaDB backend name
pub const BACKEND_CASSANDRA: &str = "cassandra";

/// DynamoDB backend name
pub const BACKEND_DYNAMODB: &str = "dynamodb";

// ============================================================================
// POSTGRES DEFAULTS
// ============================================================================

/// Default PostgreSQL port
pub const POSTGRES_DEFAULT_PORT: u16 = 5432;

/// Default maximum pool size
pub const POSTGRES_DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default connect / acquire timeout in seconds
pub const POSTGRES_DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// CASSANDRA DEFAULTS
// ============================================================================

/// Default CQL native transport port
pub const CASSANDRA_DEFAULT_PORT: u16 = 9042;

/// Default connection timeout in seconds
pub const CASSANDRA_DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// DYNAMODB DEFAULTS
// ============================================================================

/// Default AWS region
pub const DYNAMODB_DEFAULT_REGION: &str = "us-east-1";

/// Provider name reported for static credentials
pub const DYNAMODB_STATIC_CREDENTIALS_PROVIDER: &str = "durastate-static";
