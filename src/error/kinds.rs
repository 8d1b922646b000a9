use std::{fmt, io};

use crate::reflect::ValueKind;

/// Crate-wide `Result` type using [`MongodocError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, MongodocError>;

/// Top-level error type for mongodoc operations.
///
/// Document building itself can only fail with [`MongodocError::InvalidInput`];
/// the remaining variants come from the configuration layer and the
/// command-line front end.
#[derive(Debug)]
pub enum MongodocError {
    /// The top-level input is neither a record nor a mapping.
    InvalidInput(ValueKind),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// JSON input could not be parsed.
    Json(serde_json::Error),

    /// A built document could not be encoded as BSON bytes.
    Bson(bson::ser::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for MongodocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MongodocError::InvalidInput(kind) => {
                write!(f, "Invalid input type: expected record or mapping, found {kind}")
            }
            MongodocError::Config(e) => write!(f, "Configuration error: {e}"),
            MongodocError::Io(e) => write!(f, "I/O error: {e}"),
            MongodocError::Json(e) => write!(f, "JSON error: {e}"),
            MongodocError::Bson(e) => write!(f, "BSON error: {e}"),
            MongodocError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for MongodocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MongodocError::Config(e) => Some(e),
            MongodocError::Io(e) => Some(e),
            MongodocError::Json(e) => Some(e),
            MongodocError::Bson(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}

/* ========================= Conversions to MongodocError ========================= */

impl From<io::Error> for MongodocError {
    fn from(err: io::Error) -> Self {
        MongodocError::Io(err)
    }
}

impl From<serde_json::Error> for MongodocError {
    fn from(err: serde_json::Error) -> Self {
        MongodocError::Json(err)
    }
}

impl From<bson::ser::Error> for MongodocError {
    fn from(err: bson::ser::Error) -> Self {
        MongodocError::Bson(err)
    }
}

impl From<ConfigError> for MongodocError {
    fn from(err: ConfigError) -> Self {
        MongodocError::Config(err)
    }
}

impl From<String> for MongodocError {
    fn from(msg: String) -> Self {
        MongodocError::Generic(msg)
    }
}

impl From<&str> for MongodocError {
    fn from(msg: &str) -> Self {
        MongodocError::Generic(msg.to_owned())
    }
}
