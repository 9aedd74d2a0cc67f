//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns for durastate.
//!
//! ## Module Categories
//!
//! ### Configuration & Wiring
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment configuration: defaults, TOML, environment |
//! | [`factory`] | Backend construction from configuration |
//! | [`constants`] | Configuration and logging constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`health`] | Store health checks |
//! | [`logging`] | Structured logging with tracing |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod factory;
pub mod health;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, BackendConfig, ConfigBuilder, ConfigLoader};
pub use error_ext::ErrorContext;
pub use factory::BackendFactory;
pub use health::{HealthCheck, HealthStatus, check_store};
