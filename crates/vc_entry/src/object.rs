use core::any::Any;
use core::fmt;

use crate::{Deserializer, Error, Node, NodeMut, NodeRef, Serializer};

// -----------------------------------------------------------------------------
// Object

/// A user type that walks its own fields.
///
/// The framework never looks inside an object: it opens an object scope on
/// the backend and hands over the [`Serializer`] or [`Deserializer`]. The
/// object then describes its fields as entries that *borrow* them, so
/// deserialization writes straight into the object instead of copying
/// values in and out.
///
/// # Examples
///
/// ```
/// use vc_entry::{Deserializer, Entry, Error, Object, Serializer};
///
/// #[derive(Debug, Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Object for Point {
///     fn entry_name(&self) -> &str {
///         "Point"
///     }
///
///     fn serialize(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
///         serializer.serialize(&[
///             Entry::borrowed("x", &self.x),
///             Entry::borrowed("y", &self.y),
///         ])
///     }
///
///     fn deserialize(&mut self, deserializer: &mut Deserializer<'_>) -> Result<(), Error> {
///         deserializer.deserialize(&mut [
///             Entry::borrowed_mut("x", &mut self.x),
///             Entry::borrowed_mut("y", &mut self.y),
///         ])
///     }
/// }
/// ```
pub trait Object: Any + fmt::Debug {
    /// The self-declared name, used when the object is an anonymous collection element.
    fn entry_name(&self) -> &str;

    /// Emits the object's own entries.
    fn serialize(&self, serializer: &mut Serializer<'_>) -> Result<(), Error>;

    /// Populates the object's own entries from the input.
    ///
    /// Scoped backends expect the object to consume its whole input scope,
    /// which one [`Deserializer::deserialize`] call over its entries does.
    fn deserialize(&mut self, deserializer: &mut Deserializer<'_>) -> Result<(), Error>;
}

impl<T: Object> Node for T {
    #[inline]
    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::Object(self)
    }

    #[inline]
    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Object(self)
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
