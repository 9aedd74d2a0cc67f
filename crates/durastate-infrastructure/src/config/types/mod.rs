//! Configuration types module

pub mod app;
pub mod backend;
pub mod logging;

// Re-export main types
pub use app::*;
pub use backend::*;
pub use logging::*;
