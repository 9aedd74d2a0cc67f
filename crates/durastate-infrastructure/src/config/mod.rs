//! Configuration
//!
//! Typed configuration ([`types`]) and the figment-based [`loader`].

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::*;
