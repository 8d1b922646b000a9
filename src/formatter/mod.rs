//! Output formatting for built documents
//!
//! Documents are written either as relaxed Extended JSON (compact or
//! pretty-printed) or as raw BSON bytes.

use std::io::Write;

use bson::{Bson, Document};
use tracing::debug;

use crate::config::OutputFormat;
use crate::error::Result;

/// Writes documents in a configured output format
pub struct DocumentFormatter {
    /// Output format
    format: OutputFormat,
}

impl DocumentFormatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format` - Output format
    ///
    /// # Returns
    /// * `Self` - New formatter
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Write a document to `writer`
    ///
    /// JSON formats end with a newline; BSON output is the bare document.
    ///
    /// # Arguments
    /// * `doc` - Document to write
    /// * `writer` - Destination
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn write<W: Write>(&self, doc: &Document, mut writer: W) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut writer, &to_relaxed_json(doc))?;
                writer.write_all(b"\n")?;
            }
            OutputFormat::JsonPretty => {
                serde_json::to_writer_pretty(&mut writer, &to_relaxed_json(doc))?;
                writer.write_all(b"\n")?;
            }
            OutputFormat::Bson => doc.to_writer(&mut writer)?,
        }

        writer.flush()?;
        debug!("Wrote document with {} keys as {:?}", doc.len(), self.format);
        Ok(())
    }
}

/// Convert a document to relaxed Extended JSON
fn to_relaxed_json(doc: &Document) -> serde_json::Value {
    Bson::Document(doc.clone()).into_relaxed_extjson()
}
