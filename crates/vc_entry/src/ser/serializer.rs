use crate::trail::{Mark, Trail};
use crate::{Attribute, Entry, Error, List, Node, NodeRef, Value, Writer};

/// The name handed to [`Writer::begin_array`] for a collection nested in a collection.
pub const ELEMENT_NAME: &str = "item";

// -----------------------------------------------------------------------------
// Serializer

/// Walks entries in declaration order and turns each shape into [`Writer`] calls.
///
/// # Serialization Rules
///
/// - **Tuple**: `begin_object(name)`, the children in order, `end_object()`.
/// - **Collection**: `begin_array(name)`, the elements in stored order,
///   `end_array()`.
/// - **Scalar**: `write(name, value)`.
/// - **Object**: `begin_object(name)`, then the object serializes its own
///   entries through this serializer, `end_object()`.
///
/// An attribute block, `begin_attributes()`, one `write_attribute` per
/// attribute and `end_attributes()`, precedes any entry that has attributes.
///
/// Collection elements are anonymous: a scalar element is a `write_value`,
/// an object element opens a scope named after [`Object::entry_name`], and a
/// nested collection opens a scope named [`ELEMENT_NAME`].
///
/// The serializer raises no error of its own; it only forwards the writer's.
///
/// # Examples
///
/// ```
/// use vc_entry::{Entry, Error, ScalarRef, Serializer, Writer};
///
/// #[derive(Default)]
/// struct Names(Vec<String>);
///
/// impl Writer for Names {
///     fn write(&mut self, name: &str, _: ScalarRef<'_>) -> Result<(), Error> {
///         self.0.push(name.to_owned());
///         Ok(())
///     }
///     fn write_marker(&mut self, _: &str) -> Result<(), Error> { Ok(()) }
///     fn write_value(&mut self, _: ScalarRef<'_>) -> Result<(), Error> { Ok(()) }
///     fn begin_object(&mut self, name: &str) -> Result<(), Error> {
///         self.0.push(format!("{name} {{"));
///         Ok(())
///     }
///     fn end_object(&mut self) -> Result<(), Error> {
///         self.0.push("}".to_owned());
///         Ok(())
///     }
///     fn begin_array(&mut self, _: &str) -> Result<(), Error> { Ok(()) }
///     fn end_array(&mut self) -> Result<(), Error> { Ok(()) }
///     fn write_attribute(&mut self, _: &str, _: ScalarRef<'_>) -> Result<(), Error> { Ok(()) }
/// }
///
/// let tree = Entry::tuple("Root", [Entry::new("Int", 5_i32), Entry::new("Bool", true)]);
///
/// let mut names = Names::default();
/// Serializer::new(&mut names).serialize_entry(&tree).unwrap();
/// assert_eq!(names.0, ["Root {", "Int", "Bool", "}"]);
/// ```
///
/// [`Object::entry_name`]: crate::Object::entry_name
pub struct Serializer<'w> {
    writer: &'w mut dyn Writer,
    trail: Trail,
}

impl<'w> Serializer<'w> {
    #[inline]
    pub fn new(writer: &'w mut dyn Writer) -> Self {
        Self {
            writer,
            trail: Trail::new(),
        }
    }

    /// Returns the underlying writer, for objects that emit raw events.
    #[inline]
    pub fn writer(&mut self) -> &mut dyn Writer {
        &mut *self.writer
    }

    /// Serializes sibling entries in order.
    pub fn serialize(&mut self, entries: &[Entry<'_>]) -> Result<(), Error> {
        for entry in entries {
            self.serialize_entry(entry)?;
        }
        Ok(())
    }

    /// Serializes a single entry and everything below it.
    pub fn serialize_entry(&mut self, entry: &Entry<'_>) -> Result<(), Error> {
        log::trace!("serialize {} entry `{}`", entry.kind(), entry.name());
        self.scoped(entry.name().clone(), |this| this.write_entry(entry))
    }

    /// Writes a named entry that carries no value.
    #[inline]
    pub fn serialize_marker(&mut self, name: &str) -> Result<(), Error> {
        self.writer.write_marker(name)
    }

    fn scoped(
        &mut self,
        mark: impl Into<Mark>,
        f: impl FnOnce(&mut Self) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.trail.push(mark);
        let result = f(self).map_err(|err| self.trail.wrap(err));
        self.trail.pop();
        result
    }

    fn write_entry(&mut self, entry: &Entry<'_>) -> Result<(), Error> {
        self.write_attributes(entry.attributes())?;

        let name = entry.name().as_str();
        let node = match entry.value() {
            Value::Tuple(children) => {
                self.writer.begin_object(name)?;
                self.serialize(children)?;
                return self.writer.end_object();
            }
            Value::Node(slot) => slot.get(),
        };

        match node.node_ref() {
            NodeRef::Scalar(scalar) => self.writer.write(name, scalar.scalar()),
            NodeRef::List(list) => {
                self.writer.begin_array(name)?;
                self.write_elements(list)?;
                self.writer.end_array()
            }
            NodeRef::Object(object) => {
                self.writer.begin_object(name)?;
                object.serialize(self)?;
                self.writer.end_object()
            }
        }
    }

    fn write_attributes(&mut self, attributes: &[Attribute<'_>]) -> Result<(), Error> {
        if attributes.is_empty() {
            return Ok(());
        }

        self.writer.begin_attributes()?;
        for attribute in attributes {
            self.writer
                .write_attribute(attribute.name(), attribute.value().scalar())?;
        }
        self.writer.end_attributes()
    }

    fn write_elements(&mut self, list: &dyn List) -> Result<(), Error> {
        for (index, element) in list.iter().enumerate() {
            self.scoped(index, |this| this.write_element(element))?;
        }
        Ok(())
    }

    fn write_element(&mut self, element: &dyn Node) -> Result<(), Error> {
        match element.node_ref() {
            NodeRef::Scalar(scalar) => self.writer.write_value(scalar.scalar()),
            NodeRef::List(list) => {
                self.writer.begin_array(ELEMENT_NAME)?;
                self.write_elements(list)?;
                self.writer.end_array()
            }
            NodeRef::Object(object) => {
                self.writer.begin_object(object.entry_name())?;
                object.serialize(self)?;
                self.writer.end_object()
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
