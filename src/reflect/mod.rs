//! Runtime shape inspection for document building
//!
//! This module is the value inspector. Every type that can be turned into a
//! BSON document implements [`Reflect`], which exposes a borrowed view of the
//! value ([`ValueRef`]) and a zero-value predicate used by the omission policy.
//!
//! # Design
//!
//! - Scalars and opaque leaves (timestamps, object ids) hand back a ready
//!   [`Bson`] value; the builder never looks inside them.
//! - Sequences and mappings hand back borrowed children as `&dyn Reflect`.
//! - Records expose a field table ([`Record::fields`]) carrying each field's
//!   serialization key annotation. The [`record!`](crate::record) macro
//!   generates it.
//! - `Option<T>` is the only optional indirection: `None` resolves to
//!   [`ValueRef::Invalid`] and is never emitted.

mod impls;
mod macros;

use std::fmt;

use bson::Bson;

/// Effective kind of a value after indirection has been resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Unset optional or null dynamic value
    Invalid,
    /// Text, boolean or numeric value
    Scalar,
    /// Aggregate stored as a single value (timestamp, object id)
    Opaque,
    /// Ordered sequence or fixed-size array
    Sequence,
    /// Open-ended key/value mapping
    Mapping,
    /// Aggregate with named, annotated fields
    Record,
    /// Anything the builder does not know how to store
    Unsupported,
}

impl ValueKind {
    /// Check if a value of this kind can be the root of a document
    pub fn is_document_root(&self) -> bool {
        matches!(self, ValueKind::Record | ValueKind::Mapping)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => f.pad("invalid"),
            Self::Scalar => f.pad("scalar"),
            Self::Opaque => f.pad("opaque"),
            Self::Sequence => f.pad("sequence"),
            Self::Mapping => f.pad("mapping"),
            Self::Record => f.pad("record"),
            Self::Unsupported => f.pad("unsupported"),
        }
    }
}

/// Borrowed view of a value, as seen by the document builder
pub enum ValueRef<'a> {
    /// Nothing to emit (unset optional, null)
    Invalid,
    /// Leaf value stored as-is
    Scalar(Bson),
    /// Structurally aggregate leaf that must not be expanded
    Opaque(Bson),
    /// Elements in index order
    Sequence(Vec<&'a dyn Reflect>),
    /// Entries with their keys already rendered as strings
    Mapping(Vec<(String, &'a dyn Reflect)>),
    /// Record with a field table
    Record(&'a dyn Record),
    /// Kind the builder ignores
    Unsupported,
}

impl ValueRef<'_> {
    /// Get the effective kind of this view
    pub fn kind(&self) -> ValueKind {
        match self {
            ValueRef::Invalid => ValueKind::Invalid,
            ValueRef::Scalar(_) => ValueKind::Scalar,
            ValueRef::Opaque(_) => ValueKind::Opaque,
            ValueRef::Sequence(_) => ValueKind::Sequence,
            ValueRef::Mapping(_) => ValueKind::Mapping,
            ValueRef::Record(_) => ValueKind::Record,
            ValueRef::Unsupported => ValueKind::Unsupported,
        }
    }

    /// Check if the view carries nothing to emit
    pub fn is_invalid(&self) -> bool {
        matches!(self, ValueRef::Invalid)
    }
}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRef::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            ValueRef::Opaque(value) => f.debug_tuple("Opaque").field(value).finish(),
            ValueRef::Sequence(items) => write!(f, "Sequence(len = {})", items.len()),
            ValueRef::Mapping(entries) => f
                .debug_tuple("Mapping")
                .field(&entries.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>())
                .finish(),
            ValueRef::Record(record) => write!(f, "Record({})", record.record_name()),
            other => f.pad(&other.kind().to_string()),
        }
    }
}

/// Core trait for values that can be walked by the document builder
///
/// Implementations exist for the primitive types, strings, `Option`,
/// smart pointers, sequences, maps, the BSON and JSON dynamic value types,
/// and the opaque leaf types. Records get theirs from
/// [`record!`](crate::record).
pub trait Reflect {
    /// Resolve this value into a view the builder can act on
    fn reflect_ref(&self) -> ValueRef<'_>;

    /// Check if this value is the zero value of its type
    ///
    /// Used by the omission policy on record fields only.
    fn is_zero(&self) -> bool;
}

/// Aggregate with a fixed set of named fields
///
/// A field takes part in document building only when it carries a
/// serialization key annotation.
///
/// # Manual implementation
///
/// ```rust
/// use mongodoc::reflect::{Field, Record, Reflect, ValueRef, record_is_zero};
///
/// struct Tagged<T> {
///     label: String,
///     value: T,
/// }
///
/// impl<T: Reflect> Record for Tagged<T> {
///     fn record_name(&self) -> &'static str {
///         "Tagged"
///     }
///
///     fn fields(&self) -> Vec<Field<'_>> {
///         vec![
///             Field::new("label", Some("label"), &self.label),
///             Field::new("value", Some("value"), &self.value),
///         ]
///     }
/// }
///
/// impl<T: Reflect> Reflect for Tagged<T> {
///     fn reflect_ref(&self) -> ValueRef<'_> {
///         ValueRef::Record(self)
///     }
///
///     fn is_zero(&self) -> bool {
///         record_is_zero(self)
///     }
/// }
///
/// let doc = mongodoc::build(&Tagged { label: "n".to_string(), value: 3 }).unwrap();
/// assert_eq!(doc, bson::doc! { "label": "n", "value": 3 });
/// ```
pub trait Record: Reflect {
    /// Type name used in diagnostics
    fn record_name(&self) -> &'static str;

    /// All fields in declaration order, annotated or not
    fn fields(&self) -> Vec<Field<'_>>;
}

/// One field of a [`Record`]
#[derive(Clone, Copy)]
pub struct Field<'a> {
    name: &'static str,
    tag: Option<&'static str>,
    value: &'a dyn Reflect,
}

impl<'a> Field<'a> {
    /// Create a field entry
    ///
    /// # Arguments
    /// * `name` - Rust field name
    /// * `tag` - Serialization annotation, `"key"` or `"key,modifiers"`
    /// * `value` - Current field value
    pub fn new(name: &'static str, tag: Option<&'static str>, value: &'a dyn Reflect) -> Self {
        Self { name, tag, value }
    }

    /// Rust field name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current field value
    pub fn value(&self) -> &'a dyn Reflect {
        self.value
    }

    /// Serialization key derived from the annotation
    ///
    /// Only the part before the first comma is used. Returns `None` when the
    /// field has no annotation or the key part is empty.
    pub fn key(&self) -> Option<&'static str> {
        let tag = self.tag?;
        let key = tag.split_once(',').map_or(tag, |(key, _)| key);

        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// Resolve a value into its effective kind and unwrapped view
///
/// One level of `Option` is dereferenced; `None` comes back as
/// [`ValueRef::Invalid`], which callers must check before emitting.
pub fn inspect<T: Reflect + ?Sized>(value: &T) -> ValueRef<'_> {
    value.reflect_ref()
}

/// Zero predicate shared by all records: every field is zero
///
/// Unannotated fields count too.
pub fn record_is_zero<R: Record + ?Sized>(record: &R) -> bool {
    record.fields().iter().all(|field| field.value().is_zero())
}
