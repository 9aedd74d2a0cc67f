//! Domain layer constants
//!
//! Physical names shared by every backend driver. The column and attribute
//! names are part of the persisted layout and must not change.

// ============================================================================
// TABLE CONSTANTS
// ============================================================================

/// Default table name for relational and wide-column backends
pub const DEFAULT_STATES_TABLE: &str = "states_store";

// ============================================================================
// COLUMN CONSTANTS (relational and wide-column)
// ============================================================================

/// Primary / partition key column
pub const COLUMN_PERSISTENCE_ID: &str = "persistence_id";

/// Version number column (BIGINT)
pub const COLUMN_VERSION_NUMBER: &str = "version_number";

/// Serialized state column (BYTEA / blob)
pub const COLUMN_STATE_PAYLOAD: &str = "state_payload";

/// Manifest column
pub const COLUMN_STATE_MANIFEST: &str = "state_manifest";

/// Timestamp column (BIGINT, nanoseconds)
pub const COLUMN_TIMESTAMP: &str = "timestamp";

/// Shard number column (BIGINT)
pub const COLUMN_SHARD_NUMBER: &str = "shard_number";

// ============================================================================
// ATTRIBUTE CONSTANTS (key-value document)
// ============================================================================

/// Partition key attribute
pub const ATTR_PERSISTENCE_ID: &str = "PersistenceID";

/// Version number attribute (number)
pub const ATTR_VERSION_NUMBER: &str = "VersionNumber";

/// Serialized state attribute (binary)
pub const ATTR_STATE_PAYLOAD: &str = "StatePayload";

/// Manifest attribute (string)
pub const ATTR_STATE_MANIFEST: &str = "StateManifest";

/// Timestamp attribute (number)
pub const ATTR_TIMESTAMP: &str = "Timestamp";

/// Shard number attribute (number)
pub const ATTR_SHARD_NUMBER: &str = "ShardNumber";

// ============================================================================
// CODEC CONSTANTS
// ============================================================================

/// Full name of the polymorphic envelope type
///
/// Records written with this manifest resolve their concrete type from the
/// envelope's own type URL.
pub const ENVELOPE_MANIFEST: &str = "google.protobuf.Any";
