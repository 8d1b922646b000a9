//! MongoDB Document Builder Library
//!
//! Turns Rust values into BSON documents ready to hand to the MongoDB
//! driver. Records declared with [`record!`] contribute only their annotated,
//! non-zero fields; maps contribute every entry. Nested records, maps and
//! sequences are converted recursively, while timestamps and object ids are
//! kept as single BSON values.
//!
//! # Modules
//!
//! - `reflect`: Value inspection (`Reflect`, `Record`, `record!`)
//! - `builder`: Recursive document builder
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Document output formats
//! - `cli`: Command-line front end
//!
//! # Example
//!
//! ```rust
//! use bson::{DateTime, doc};
//! use std::collections::HashMap;
//!
//! mongodoc::record! {
//!     pub struct Entity {
//!         pub id: String => "id",
//!         pub active: bool => "active",
//!         pub created_at: DateTime => "createdAt",
//!         pub scratch: String,
//!     }
//! }
//!
//! let now = DateTime::now();
//! let entity = Entity {
//!     id: "abc".to_string(),
//!     active: false,
//!     created_at: now,
//!     scratch: "not stored".to_string(),
//! };
//!
//! // zero-valued and unannotated record fields are left out
//! let doc = mongodoc::build(&entity)?;
//! assert_eq!(doc, doc! { "id": "abc", "createdAt": now });
//!
//! // maps keep every entry
//! let flags = HashMap::from([("active", false)]);
//! assert_eq!(mongodoc::build(&flags)?, doc! { "active": false });
//!
//! // only records and maps can be the root of a document
//! assert!(mongodoc::build(&100).is_err());
//! # Ok::<(), mongodoc::MongodocError>(())
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod formatter;
pub mod reflect;

use bson::Document;

// Re-export commonly used types
pub use builder::{BuildOptions, DocumentBuilder};
pub use config::Config;
pub use error::{MongodocError, Result};
pub use formatter::DocumentFormatter;
pub use reflect::{Field, Record, Reflect, ValueKind, ValueRef, inspect};

/// Build a BSON document from a record or mapping
///
/// Uses the default [`BuildOptions`]: zero-valued record fields are omitted
/// and nesting is unbounded.
///
/// # Arguments
/// * `input` - Record or mapping, optionally behind `Option`
///
/// # Returns
/// * `Result<Document>` - Built document, or [`MongodocError::InvalidInput`]
///   for any other kind of input
pub fn build<T: Reflect + ?Sized>(input: &T) -> Result<Document> {
    DocumentBuilder::default().build(input)
}

/// Build a BSON document with explicit options
///
/// # Arguments
/// * `input` - Record or mapping, optionally behind `Option`
/// * `options` - Build options
///
/// # Returns
/// * `Result<Document>` - Built document or error
pub fn build_with<T: Reflect + ?Sized>(input: &T, options: &BuildOptions) -> Result<Document> {
    DocumentBuilder::new(*options).build(input)
}
