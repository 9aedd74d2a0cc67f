//! Error handling types
//!
//! Every public operation of the store returns [`Result`]. The variants
//! follow the store's failure taxonomy: connection failures, codec failures
//! (encoding, decoding, unknown type, unpack), backend read/write failures
//! and cancellation. Absence of a record is never an error.

use std::fmt;

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed foreign error kept as the `source` of a domain error
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why an in-flight operation was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationCause {
    /// The caller's cancellation token fired
    Cancelled,
    /// The caller's deadline elapsed
    DeadlineExceeded,
}

impl fmt::Display for CancellationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled by caller"),
            Self::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Main error type for durastate
#[derive(Error, Debug)]
pub enum Error {
    /// Backend unreachable, authentication failed, or no live session
    #[error("Connection error ({backend}): {message}")]
    Connection {
        /// Backend name (e.g. "postgres")
        backend: String,
        /// Description of the connection failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// The state message could not be serialized
    #[error("Encoding error for '{manifest}': {message}")]
    Encoding {
        /// Manifest of the message being encoded
        manifest: String,
        /// Description of the encoding failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Stored bytes do not parse as the manifest's wire format
    #[error("Decoding error for '{manifest}': {message}")]
    Decoding {
        /// Manifest the bytes were decoded as
        manifest: String,
        /// Description of the decoding failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// No decoder is registered under the manifest
    #[error("Unknown state type: '{manifest}' is not registered")]
    UnknownType {
        /// The unresolved manifest
        manifest: String,
    },

    /// The envelope does not carry the manifest's declared type
    #[error("Unpack error for '{manifest}': {message}")]
    Unpack {
        /// Manifest the envelope was expected to carry
        manifest: String,
        /// Description of the mismatch
        message: String,
    },

    /// The backend rejected or failed an upsert
    #[error("Backend write error ({backend}, persistence_id={persistence_id}): {message}")]
    BackendWrite {
        /// Backend name
        backend: String,
        /// Key of the record being written
        persistence_id: String,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// The backend failed a point lookup or returned malformed data
    #[error("Backend read error ({backend}, persistence_id={persistence_id}): {message}")]
    BackendRead {
        /// Backend name
        backend: String,
        /// Key of the record being read
        persistence_id: String,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// The caller cancelled the operation or its deadline elapsed
    #[error("Operation '{operation}' {cause}")]
    Cancelled {
        /// Facade operation that was abandoned
        operation: String,
        /// Token cancellation or deadline
        cause: CancellationCause,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },
}

// Connection error creation methods
impl Error {
    /// Create a connection error
    pub fn connection<B: Into<String>, S: Into<String>>(backend: B, message: S) -> Self {
        Self::Connection {
            backend: backend.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection error with source
    pub fn connection_with_source<B, S, E>(backend: B, message: S, source: E) -> Self
    where
        B: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            backend: backend.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// A session backend was used before `connect` or after `disconnect`
    pub fn not_connected<B: Into<String>>(backend: B) -> Self {
        Self::connection(backend, "not connected; call connect first")
    }
}

// Codec error creation methods
impl Error {
    /// Create an encoding error with source
    pub fn encoding<M, S, E>(manifest: M, message: S, source: E) -> Self
    where
        M: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Encoding {
            manifest: manifest.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an encoding error without a source
    pub fn encoding_msg<M: Into<String>, S: Into<String>>(manifest: M, message: S) -> Self {
        Self::Encoding {
            manifest: manifest.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a decoding error with source
    pub fn decoding<M, S, E>(manifest: M, message: S, source: E) -> Self
    where
        M: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decoding {
            manifest: manifest.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unknown type error
    pub fn unknown_type<M: Into<String>>(manifest: M) -> Self {
        Self::UnknownType {
            manifest: manifest.into(),
        }
    }

    /// Create an unpack error
    pub fn unpack<M: Into<String>, S: Into<String>>(manifest: M, message: S) -> Self {
        Self::Unpack {
            manifest: manifest.into(),
            message: message.into(),
        }
    }
}

// Backend error creation methods
impl Error {
    /// Create a backend write error
    pub fn backend_write<B, P, S>(backend: B, persistence_id: P, message: S) -> Self
    where
        B: Into<String>,
        P: Into<String>,
        S: Into<String>,
    {
        Self::BackendWrite {
            backend: backend.into(),
            persistence_id: persistence_id.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a backend write error with source
    pub fn backend_write_with_source<B, P, S, E>(
        backend: B,
        persistence_id: P,
        message: S,
        source: E,
    ) -> Self
    where
        B: Into<String>,
        P: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::BackendWrite {
            backend: backend.into(),
            persistence_id: persistence_id.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a backend read error
    pub fn backend_read<B, P, S>(backend: B, persistence_id: P, message: S) -> Self
    where
        B: Into<String>,
        P: Into<String>,
        S: Into<String>,
    {
        Self::BackendRead {
            backend: backend.into(),
            persistence_id: persistence_id.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a backend read error with source
    pub fn backend_read_with_source<B, P, S, E>(
        backend: B,
        persistence_id: P,
        message: S,
        source: E,
    ) -> Self
    where
        B: Into<String>,
        P: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::BackendRead {
            backend: backend.into(),
            persistence_id: persistence_id.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Caller-facing error creation methods
impl Error {
    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(operation: S, cause: CancellationCause) -> Self {
        Self::Cancelled {
            operation: operation.into(),
            cause,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Classification
impl Error {
    /// True for [`Error::Cancelled`]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// True for encoding, decoding, unknown type and unpack failures
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Self::Encoding { .. }
                | Self::Decoding { .. }
                | Self::UnknownType { .. }
                | Self::Unpack { .. }
        )
    }

    /// True for backend read and write failures
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Self::BackendWrite { .. } | Self::BackendRead { .. })
    }

    /// True for connection failures
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}
