use alloc::string::String;
use alloc::vec::Vec;

use vc_entry::ser::ELEMENT_NAME;
use vc_entry::{Error, Reader, Scalar};

use super::{DocField, DocScalar, DocValue, Document};

// -----------------------------------------------------------------------------
// Event

type Attributes<'d> = &'d [(String, DocScalar)];

#[derive(Debug, Clone, Copy)]
enum Event<'d> {
    Start {
        name: &'d str,
        attributes: Attributes<'d>,
    },
    Value(&'d DocScalar),
    End,
}

fn push_field<'d>(events: &mut Vec<Event<'d>>, field: &'d DocField) {
    events.push(Event::Start {
        name: &field.name,
        attributes: &field.attributes,
    });
    push_value(events, &field.value);
    events.push(Event::End);
}

fn push_value<'d>(events: &mut Vec<Event<'d>>, value: &'d DocValue) {
    match value {
        DocValue::Marker => {}
        DocValue::Scalar(scalar) => events.push(Event::Value(scalar)),
        DocValue::Object(fields) => {
            for field in fields {
                push_field(events, field);
            }
        }
        DocValue::Array(items) => {
            for item in items {
                events.push(Event::Start {
                    name: ELEMENT_NAME,
                    attributes: &[],
                });
                push_value(events, item);
                events.push(Event::End);
            }
        }
    }
}

// -----------------------------------------------------------------------------
// DocumentReader

/// A [`Reader`] replaying a [`Document`].
///
/// The document is flattened into a stream of start, value and end events.
/// Every request consumes the stream up to the end of what it asked for, so
/// input that matches no entry, or has the wrong shape for its entry, is
/// skipped as a whole. A bare value met where entries or elements were
/// expected is reported through [`Reader::take_stray_value`].
///
/// # Examples
///
/// ```
/// use vc_backend::document::{DocField, DocScalar, DocValue, Document, DocumentReader};
/// use vc_entry::{Deserializer, Entry};
///
/// let doc = Document {
///     fields: vec![DocField::new("Int", DocValue::Scalar(DocScalar::Int(8)))],
/// };
///
/// let mut value = 0_i32;
/// let mut reader = DocumentReader::new(&doc);
/// Deserializer::new(&mut reader)
///     .deserialize(&mut [Entry::borrowed_mut("Int", &mut value)])
///     .unwrap();
/// assert_eq!(value, 8);
/// ```
#[derive(Debug)]
pub struct DocumentReader<'d> {
    events: Vec<Event<'d>>,
    position: usize,
    attributes: Attributes<'d>,
    stray: bool,
}

impl<'d> DocumentReader<'d> {
    pub fn new(document: &'d Document) -> Self {
        let mut events = Vec::new();
        for field in &document.fields {
            push_field(&mut events, field);
        }

        Self {
            events,
            position: 0,
            attributes: &[],
            stray: false,
        }
    }

    /// Returns `true` once every event has been consumed.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.position >= self.events.len()
    }

    #[inline]
    fn peek(&self) -> Option<Event<'d>> {
        self.events.get(self.position).copied()
    }

    #[inline]
    fn advance(&mut self) -> Option<Event<'d>> {
        let event = self.peek();
        if event.is_some() {
            self.position += 1;
        }
        event
    }

    /// Moves into the next element of the current scope.
    ///
    /// Returns `None`, having left the scope, when it has no more elements.
    fn next_start(&mut self) -> Option<&'d str> {
        while let Some(event) = self.advance() {
            match event {
                Event::Start { name, attributes } => {
                    self.attributes = attributes;
                    return Some(name);
                }
                Event::End => return None,
                Event::Value(_) => {
                    log::debug!("value found where entries were expected, skipping it");
                    self.stray = true;
                }
            }
        }
        None
    }

    /// Consumes the rest of the current element, including its end.
    fn skip_element(&mut self) {
        let mut depth = 1_usize;
        while let Some(event) = self.advance() {
            match event {
                Event::Start { .. } => depth += 1,
                Event::End => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                Event::Value(_) => {}
            }
        }
    }
}

impl Reader for DocumentReader<'_> {
    fn next_entry_name(&mut self) -> Result<Option<String>, Error> {
        Ok(self.next_start().map(String::from))
    }

    fn next_array_element(&mut self) -> Result<bool, Error> {
        Ok(self.next_start().is_some())
    }

    fn read_value(&mut self, target: &mut dyn Scalar) -> Result<bool, Error> {
        match self.peek() {
            Some(Event::Value(scalar)) => {
                self.position += 1;
                target.set_scalar(scalar.as_scalar())?;
                self.skip_element();
                Ok(true)
            }
            Some(Event::End) => {
                self.position += 1;
                Ok(false)
            }
            Some(Event::Start { .. }) => {
                log::debug!("structured input found where a value was expected, skipping it");
                self.skip_element();
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn read_attribute(&mut self, name: &str, target: &mut dyn Scalar) -> Result<bool, Error> {
        match self.attributes.iter().find(|(key, _)| key == name) {
            Some((_, value)) => {
                target.set_scalar(value.as_scalar())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn skip_entry(&mut self) -> Result<(), Error> {
        self.skip_element();
        Ok(())
    }

    #[inline]
    fn take_stray_value(&mut self) -> bool {
        core::mem::take(&mut self.stray)
    }
}

// -----------------------------------------------------------------------------
// Tests
