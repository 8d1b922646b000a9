//! Recursive document builder
//!
//! Walks a [`Reflect`] value depth-first and writes it into a BSON
//! [`Document`]:
//!
//! - scalars and opaque leaves are stored as-is
//! - sequences become arrays, element by element, in index order
//! - mappings and records become nested documents, except at depth 0
//!   where their entries are merged into the output document itself
//! - record fields without a key annotation, or holding a zero value,
//!   are left out; mapping entries and sequence elements never are
//!
//! The walk itself never fails. Only [`DocumentBuilder::build`] rejects an
//! input, when its root is neither a record nor a mapping.

use bson::{Bson, Document};
use tracing::{debug, trace, warn};

use crate::error::{MongodocError, Result};
use crate::reflect::{Record, Reflect, ValueRef, inspect};

/// Options controlling how documents are built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Leave zero-valued record fields out of the document
    pub omit_zero_fields: bool,

    /// Deepest nesting level that is still written (root is 0)
    pub max_depth: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            omit_zero_fields: true,
            max_depth: None,
        }
    }
}

/// Builds BSON documents from records and mappings
///
/// A builder holds no state besides its options, so one instance can be
/// shared and used from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    options: BuildOptions,
}

impl DocumentBuilder {
    /// Create a new builder
    ///
    /// # Arguments
    /// * `options` - Build options
    ///
    /// # Returns
    /// * `Self` - New builder
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build a document from a record or mapping
    ///
    /// # Arguments
    /// * `input` - Root value, a record or a mapping (optionally behind `Option`)
    ///
    /// # Returns
    /// * `Result<Document>` - Built document, or [`MongodocError::InvalidInput`]
    ///   when the root has any other kind
    pub fn build<T: Reflect + ?Sized>(&self, input: &T) -> Result<Document> {
        let root = inspect(input);
        let kind = root.kind();

        if !kind.is_document_root() {
            debug!("Rejecting {} input", kind);
            return Err(MongodocError::InvalidInput(kind));
        }

        let mut document = Document::new();
        self.build_resolved(0, &mut document, "", root);

        debug!("Built document from {} with {} keys", kind, document.len());
        Ok(document)
    }

    /// Build `value` into `container` under `key`
    fn build_value(&self, depth: usize, container: &mut Document, key: &str, value: &dyn Reflect) {
        self.build_resolved(depth, container, key, inspect(value));
    }

    fn build_resolved(&self, depth: usize, container: &mut Document, key: &str, value: ValueRef<'_>) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            warn!("Skipping '{}': depth {} exceeds the limit", key, depth);
            return;
        }

        match value {
            ValueRef::Invalid => trace!("Skipping unset value for '{}'", key),
            ValueRef::Scalar(leaf) | ValueRef::Opaque(leaf) => {
                container.insert(key, leaf);
            }
            ValueRef::Sequence(items) => {
                let array = self.build_sequence(depth + 1, items);
                container.insert(key, array);
            }
            ValueRef::Mapping(entries) => {
                self.build_nested(depth, container, key, |destination| {
                    for (entry_key, entry) in entries {
                        self.build_value(depth + 1, destination, &entry_key, entry);
                    }
                });
            }
            ValueRef::Record(record) => {
                self.build_nested(depth, container, key, |destination| {
                    self.build_fields(depth + 1, destination, record);
                });
            }
            ValueRef::Unsupported => trace!("Skipping unsupported value for '{}'", key),
        }
    }

    /// Run `fill` on the document a record or mapping writes into
    ///
    /// At depth 0 that is `container` itself; deeper levels get a fresh
    /// document stored under `key`.
    fn build_nested<F>(&self, depth: usize, container: &mut Document, key: &str, fill: F)
    where
        F: FnOnce(&mut Document),
    {
        if depth == 0 {
            fill(container);
        } else {
            let mut nested = Document::new();
            fill(&mut nested);
            container.insert(key, nested);
        }
    }

    /// Build each element through a one-entry scratch document
    ///
    /// Elements that produce nothing are kept as `null` so positions hold.
    fn build_sequence(&self, depth: usize, items: Vec<&dyn Reflect>) -> Bson {
        let mut array = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            let mut scratch = Document::new();
            let scratch_key = index.to_string();
            self.build_value(depth, &mut scratch, &scratch_key, item);
            array.push(scratch.remove(&scratch_key).unwrap_or(Bson::Null));
        }

        Bson::Array(array)
    }

    fn build_fields(&self, depth: usize, destination: &mut Document, record: &dyn Record) {
        for field in record.fields() {
            let Some(key) = field.key() else {
                trace!("Skipping unannotated field {}.{}", record.record_name(), field.name());
                continue;
            };

            if self.options.omit_zero_fields && field.value().is_zero() {
                trace!("Omitting zero field {}.{}", record.record_name(), field.name());
                continue;
            }

            self.build_value(depth, destination, key, field.value());
        }
    }
}

#[cfg(test)]
mod tests;
