//! Infrastructure layer constants
//!
//! Backend identifiers and connection defaults are defined in
//! `durastate_providers::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "durastate.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "durastate";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "DURASTATE";

/// Separator between nested keys in environment variable names
///
/// `DURASTATE_BACKEND__MAX_CONNECTIONS` sets `backend.max_connections`.
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log filter
pub const LOG_FILTER_ENV: &str = "DURASTATE_LOG";

// ============================================================================
// HEALTH CHECK CONSTANTS
// ============================================================================

/// Default health check timeout in seconds
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 10;
