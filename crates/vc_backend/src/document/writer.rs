use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use vc_entry::{Error, ScalarRef, Writer};

use super::{DocField, DocScalar, DocValue, Document};

// -----------------------------------------------------------------------------
// Frame

type Attributes = Vec<(String, DocScalar)>;

#[derive(Debug)]
enum Frame {
    Object {
        name: String,
        attributes: Attributes,
        fields: Vec<DocField>,
    },
    Array {
        name: String,
        attributes: Attributes,
        items: Vec<DocValue>,
    },
}

// -----------------------------------------------------------------------------
// DocumentWriter

/// A [`Writer`] that records the output as a [`Document`].
///
/// Attributes are buffered until the entry they precede is written.
/// Elements of an array lose their names and attributes, which the read
/// side never asks for.
///
/// # Examples
///
/// ```
/// use vc_backend::document::DocumentWriter;
/// use vc_entry::{Entry, Serializer};
///
/// let mut writer = DocumentWriter::new();
/// Serializer::new(&mut writer)
///     .serialize(&[Entry::new("Vec", vec![1_u8, 2])])
///     .unwrap();
///
/// let doc = writer.finish().unwrap();
/// assert_eq!(doc.fields[0].name, "Vec");
/// ```
#[derive(Debug, Default)]
pub struct DocumentWriter {
    fields: Vec<DocField>,
    stack: Vec<Frame>,
    pending: Attributes,
}

impl DocumentWriter {
    #[inline]
    pub const fn new() -> Self {
        Self {
            fields: Vec::new(),
            stack: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Returns the recorded document.
    ///
    /// Fails if a scope is still open or attributes are left without an entry.
    pub fn finish(self) -> Result<Document, Error> {
        if !self.stack.is_empty() {
            return Err(Error::backend(alloc::format!(
                "{} scope(s) still open at the end of the document",
                self.stack.len()
            )));
        }
        if !self.pending.is_empty() {
            return Err(Error::backend("attributes written without a following entry"));
        }

        log::debug!("document recorded with {} top-level field(s)", self.fields.len());
        Ok(Document {
            fields: self.fields,
        })
    }

    fn push_field(&mut self, name: &str, value: DocValue) -> Result<(), Error> {
        let field = DocField {
            name: String::from(name),
            attributes: mem::take(&mut self.pending),
            value,
        };

        match self.stack.last_mut() {
            None => self.fields.push(field),
            Some(Frame::Object { fields, .. }) => fields.push(field),
            Some(Frame::Array { name: array, .. }) => {
                return Err(Error::backend(alloc::format!(
                    "named entry `{}` written inside array `{array}`",
                    field.name
                )));
            }
        }
        Ok(())
    }

    fn close(&mut self, name: String, attributes: Attributes, value: DocValue) -> Result<(), Error> {
        match self.stack.last_mut() {
            Some(Frame::Array { items, .. }) => {
                items.push(value);
                Ok(())
            }
            _ => {
                self.pending = attributes;
                self.push_field(&name, value)
            }
        }
    }
}

impl Writer for DocumentWriter {
    fn write(&mut self, name: &str, value: ScalarRef<'_>) -> Result<(), Error> {
        self.push_field(name, DocValue::Scalar(DocScalar::from_scalar(value)))
    }

    fn write_marker(&mut self, name: &str) -> Result<(), Error> {
        self.push_field(name, DocValue::Marker)
    }

    fn write_value(&mut self, value: ScalarRef<'_>) -> Result<(), Error> {
        match self.stack.last_mut() {
            Some(Frame::Array { items, .. }) => {
                items.push(DocValue::Scalar(DocScalar::from_scalar(value)));
                Ok(())
            }
            _ => Err(Error::backend("anonymous value written outside of an array")),
        }
    }

    fn begin_object(&mut self, name: &str) -> Result<(), Error> {
        self.stack.push(Frame::Object {
            name: String::from(name),
            attributes: mem::take(&mut self.pending),
            fields: Vec::new(),
        });
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Error> {
        match self
            .stack
            .pop_if(|frame| matches!(frame, Frame::Object { .. }))
        {
            Some(Frame::Object {
                name,
                attributes,
                fields,
            }) => self.close(name, attributes, DocValue::Object(fields)),
            _ => Err(Error::backend("`end_object` does not match an open object")),
        }
    }

    fn begin_array(&mut self, name: &str) -> Result<(), Error> {
        self.stack.push(Frame::Array {
            name: String::from(name),
            attributes: mem::take(&mut self.pending),
            items: Vec::new(),
        });
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Error> {
        match self
            .stack
            .pop_if(|frame| matches!(frame, Frame::Array { .. }))
        {
            Some(Frame::Array {
                name,
                attributes,
                items,
            }) => self.close(name, attributes, DocValue::Array(items)),
            _ => Err(Error::backend("`end_array` does not match an open array")),
        }
    }

    fn write_attribute(&mut self, name: &str, value: ScalarRef<'_>) -> Result<(), Error> {
        self.pending
            .push((String::from(name), DocScalar::from_scalar(value)));
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use vc_entry::{Attribute, Entry, Error, ScalarRef, Writer};

    use super::DocumentWriter;
    use crate::document::{DocField, DocScalar, DocValue, to_document};

    #[test]
    fn attributes_attach_to_the_next_entry() {
        let tree = Entry::tuple("Root", [
            Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
            Entry::new("Vec", vec![1_u8, 2]).with_attribute(Attribute::new("MAX", 4_u8)),
        ])
        .with_attribute(Attribute::new("VERSION", String::from("1")));

        let doc = to_document(&[tree]).unwrap();
        assert_eq!(doc.fields, [DocField {
            name: "Root".into(),
            attributes: vec![("VERSION".into(), DocScalar::Str("1".into()))],
            value: DocValue::Object(vec![
                DocField::new("Int", DocValue::Scalar(DocScalar::Int(5)))
                    .with_attribute("ENABLE", DocScalar::Bool(true)),
                DocField::new(
                    "Vec",
                    DocValue::Array(vec![
                        DocValue::Scalar(DocScalar::UInt(1)),
                        DocValue::Scalar(DocScalar::UInt(2)),
                    ]),
                )
                .with_attribute("MAX", DocScalar::UInt(4)),
            ]),
        }]);
    }

    #[test]
    fn nested_arrays_and_displayable_values() {
        let tree = Entry::new("Grid", vec![vec![0.5_f32], vec![]]);
        let doc = to_document(&[tree]).unwrap();

        assert_eq!(
            doc.fields[0].value,
            DocValue::Array(vec![
                DocValue::Array(vec![DocValue::Scalar(DocScalar::Str("0.5".into()))]),
                DocValue::Array(vec![]),
            ])
        );
    }

    #[test]
    fn unbalanced_calls_fail() {
        let mut writer = DocumentWriter::new();
        assert!(matches!(writer.end_object(), Err(Error::Backend(_))));
        assert!(writer.write_value(ScalarRef::Int(1)).is_err());

        writer.begin_array("Vec").unwrap();
        assert!(writer.write("Int", ScalarRef::Int(1)).is_err());
        assert!(writer.end_object().is_err());

        let mut writer = DocumentWriter::new();
        writer.begin_object("Root").unwrap();
        assert!(writer.finish().is_err());

        let mut writer = DocumentWriter::new();
        writer.write_attribute("ENABLE", ScalarRef::Bool(true)).unwrap();
        assert!(writer.finish().is_err());
    }
}
