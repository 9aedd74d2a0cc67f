//! Main application configuration

use serde::{Deserialize, Serialize};

use super::backend::BackendConfig;
use super::logging::LoggingConfig;

/// Root configuration
///
/// ```toml
/// [logging]
/// level = "debug"
///
/// [backend]
/// provider = "postgres"
/// host = "db.internal"
/// table = "states_store"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Storage backend selection and settings
    #[serde(default)]
    pub backend: BackendConfig,
}
