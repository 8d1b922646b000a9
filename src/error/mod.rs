//! Error handling module.
//!
//! Building a document has a single failure mode, an input that is neither
//! a record nor a mapping. Everything else in this module serves the
//! configuration layer and the command-line front end.
//!
//! # Example
//!
//! ```rust
//! use mongodoc::error::MongodocError;
//!
//! let err = mongodoc::build(&100).unwrap_err();
//! assert!(matches!(err, MongodocError::InvalidInput(_)));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, MongodocError, Result};
