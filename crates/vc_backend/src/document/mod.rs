//! An ordered, in-memory document mirroring the writer protocol.
//!
//! [`DocumentWriter`] records a serialization as a [`Document`];
//! [`DocumentReader`] replays one into a deserialization. The document
//! implements serde's `Serialize` and `Deserialize`, so any serde format can
//! carry a tree:
//!
//! - an object is a map of its fields, in order,
//! - an array is a sequence,
//! - a marker is a unit,
//! - attributes are map keys prefixed with `@`; a non-object value that
//!   carries attributes moves under the `$value` key,
//! - a field whose name starts with `@` or `$` gets one more `$` in front,
//!   so `$value` is stored as `$$value` and `@x` as `$@x`.
//!
//! ```text
//! { "Root": { "Int": { "@ENABLE": true, "$value": 5 }, "Str": "Test" } }
//! ```

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod serde;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::DocumentReader;
pub use writer::DocumentWriter;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use vc_entry::de::{DeserializeReport, DeserializerConfig};
use vc_entry::{Deserializer, Entry, Error, ScalarRef, Serializer};

/// The key prefix of attributes in the serde representation.
pub const ATTRIBUTE_PREFIX: char = '@';

/// The key of an annotated non-object value in the serde representation.
pub const VALUE_KEY: &str = "$value";

/// The key prefix of fields whose name would read as a reserved key.
pub const ESCAPE_PREFIX: char = '$';

// -----------------------------------------------------------------------------
// Model

/// A scalar of a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub enum DocScalar {
    Int(i64),
    UInt(u64),
    Bool(bool),
    Str(String),
}

impl DocScalar {
    /// Converts a written scalar. Values formatted by the backend become strings.
    pub fn from_scalar(value: ScalarRef<'_>) -> Self {
        match value {
            ScalarRef::Int(value) => Self::Int(value),
            ScalarRef::UInt(value) => Self::UInt(value),
            ScalarRef::Bool(value) => Self::Bool(value),
            ScalarRef::Str(value) => Self::Str(String::from(value)),
            ScalarRef::Other(value) => Self::Str(alloc::format!("{value}")),
        }
    }

    #[inline]
    pub fn as_scalar(&self) -> ScalarRef<'_> {
        match self {
            Self::Int(value) => ScalarRef::Int(*value),
            Self::UInt(value) => ScalarRef::UInt(*value),
            Self::Bool(value) => ScalarRef::Bool(*value),
            Self::Str(value) => ScalarRef::Str(value),
        }
    }
}

impl fmt::Display for DocScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_scalar(), f)
    }
}

/// A value of a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    /// An entry written without a value.
    Marker,
    Scalar(DocScalar),
    Object(Vec<DocField>),
    Array(Vec<DocValue>),
}

/// A named value of a [`Document`], with its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct DocField {
    pub name: String,
    pub attributes: Vec<(String, DocScalar)>,
    pub value: DocValue,
}

impl DocField {
    #[inline]
    pub fn new(name: impl Into<String>, value: DocValue) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            value,
        }
    }

    #[inline]
    pub fn with_attribute(mut self, name: impl Into<String>, value: DocScalar) -> Self {
        self.attributes.push((name.into(), value));
        self
    }

    /// Returns the first attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&DocScalar> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// An ordered sequence of top-level fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub fields: Vec<DocField>,
}

impl Document {
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Returns the first top-level field named `name`.
    pub fn field(&self, name: &str) -> Option<&DocField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Serializes entries into a new [`Document`].
///
/// # Examples
///
/// ```
/// use vc_backend::document::{self, DocScalar, DocValue};
/// use vc_entry::{Attribute, Entry};
///
/// let tree = Entry::tuple("Root", [
///     Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
/// ]);
///
/// let doc = document::to_document(&[tree]).unwrap();
/// let DocValue::Object(fields) = &doc.field("Root").unwrap().value else {
///     unreachable!()
/// };
/// assert_eq!(fields[0].value, DocValue::Scalar(DocScalar::Int(5)));
/// assert_eq!(fields[0].attribute("ENABLE"), Some(&DocScalar::Bool(true)));
/// ```
pub fn to_document(entries: &[Entry<'_>]) -> Result<Document, Error> {
    let mut writer = DocumentWriter::new();
    Serializer::new(&mut writer).serialize(entries)?;
    writer.finish()
}

/// Deserializes a [`Document`] into entries with the default configuration.
pub fn from_document(
    document: &Document,
    entries: &mut [Entry<'_>],
) -> Result<DeserializeReport, Error> {
    from_document_with(document, entries, DeserializerConfig::new())
}

/// Deserializes a [`Document`] into entries.
pub fn from_document_with(
    document: &Document,
    entries: &mut [Entry<'_>],
    config: DeserializerConfig,
) -> Result<DeserializeReport, Error> {
    let mut reader = DocumentReader::new(document);
    let mut deserializer = Deserializer::with_config(&mut reader, config);
    deserializer.deserialize(entries)?;
    Ok(deserializer.into_report())
}
