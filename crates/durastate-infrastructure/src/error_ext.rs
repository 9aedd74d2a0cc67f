//! Error extension utilities
//!
//! Context helpers that convert foreign errors (figment, TOML, I/O) into
//! domain [`Error`]s while keeping the original as the source.

use std::fmt;

use durastate_domain::error::{Error, Result};

/// Extension trait for adding context to errors
///
/// # Example
///
/// ```ignore
/// use durastate_infrastructure::error_ext::ErrorContext;
///
/// let raw = std::fs::read_to_string(&path)
///     .config_context(format!("failed to read {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Wrap the error as a configuration error
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display;

    /// Wrap the error as a connection error against `backend`
    fn connection_context<C>(self, backend: &str, context: C) -> Result<T>
    where
        C: fmt::Display;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display,
    {
        self.map_err(|err| Error::configuration_with_source(format!("{context}: {err}"), err))
    }

    fn connection_context<C>(self, backend: &str, context: C) -> Result<T>
    where
        C: fmt::Display,
    {
        self.map_err(|err| {
            Error::connection_with_source(backend, format!("{context}: {err}"), err)
        })
    }
}

/// Re-label an `InvalidArgument` from a driver constructor as a configuration error
pub(crate) fn invalid_config(section: &str, error: Error) -> Error {
    match error {
        Error::InvalidArgument { message } => Error::configuration(format!("{section}: {message}")),
        other => other,
    }
}
