//! Application Layer - durastate
//!
//! Orchestrates the domain's codec and record model over a backend driver.
//!
//! ## Components
//!
//! - [`DurableStore`]: the durable state store facade, with its connection
//!   lifecycle and cancellation handling
//! - [`conformance`]: a reusable suite every backend driver must pass
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `durastate-domain`: record model, codec and port traits
//! - Pure Rust libraries for async and logging
//!
//! Concrete backend drivers live in `durastate-providers` and are wired up
//! by `durastate-infrastructure`.

pub mod conformance;
pub mod guard;
pub mod store;

pub use store::{DurableStore, LifecycleState};
