//! Checked conversion between record fields and signed BIGINT columns
//!
//! Version and shard are unsigned in the record model but stored in signed
//! 64-bit columns. Values that do not fit are rejected, never wrapped.

use durastate_domain::error::{Error, Result};

/// Convert an unsigned record field for a BIGINT column
pub fn to_bigint(backend: &str, persistence_id: &str, field: &str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| {
        Error::backend_write(
            backend,
            persistence_id,
            format!("{field} {value} exceeds the signed 64-bit column range"),
        )
    })
}

/// Convert a stored BIGINT back to an unsigned record field
pub fn from_bigint(backend: &str, persistence_id: &str, field: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        Error::backend_read(
            backend,
            persistence_id,
            format!("stored {field} {value} is negative"),
        )
    })
}
