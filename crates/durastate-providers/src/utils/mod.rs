//! Shared helpers for backend drivers

pub mod identifier;
pub mod numeric;

pub use identifier::{validate_qualified_identifier, validate_table_identifier};
pub use numeric::{from_bigint, to_bigint};
