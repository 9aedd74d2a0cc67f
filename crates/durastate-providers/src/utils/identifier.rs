//! SQL / CQL identifier validation
//!
//! Table names are spliced into statements, so only plain identifiers are
//! accepted: `[A-Za-z_][A-Za-z0-9_]*`, optionally `schema.table`.

use durastate_domain::error::{Error, Result};

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate an unqualified table name
pub fn validate_table_identifier(name: &str) -> Result<()> {
    if is_plain_identifier(name) {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "invalid table identifier '{name}'"
        )))
    }
}

/// Validate a table name that may carry one schema qualifier
pub fn validate_qualified_identifier(name: &str) -> Result<()> {
    let valid = match name.split_once('.') {
        Some((schema, table)) => is_plain_identifier(schema) && is_plain_identifier(table),
        None => is_plain_identifier(name),
    };
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "invalid table identifier '{name}'"
        )))
    }
}
