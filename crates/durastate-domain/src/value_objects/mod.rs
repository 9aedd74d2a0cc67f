//! Domain Value Objects
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`DurableState`] | Typed state plus metadata exchanged with the runtime |
//! | [`DurableStateRecord`] | Backend-neutral stored row |
//! | [`CallContext`] | Cancellation token and deadline for one call |

/// Call context value object
pub mod context;
/// Durable state value object
pub mod durable_state;
/// Record model
pub mod record;

pub use context::CallContext;
pub use durable_state::DurableState;
pub use record::{DurableStateRecord, validate_persistence_id};
