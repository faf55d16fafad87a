use crate::{Error, ScalarRef};

/// The output side of a backend, driven by a [`Serializer`].
///
/// Calls arrive in traversal order and are well nested: every `begin_*` is
/// matched by the corresponding `end_*`. When an entry carries attributes,
/// the attribute block comes right before the entry itself, whatever its
/// shape.
///
/// The trait is object safe; the serializer only sees `&mut dyn Writer`.
///
/// [`Serializer`]: crate::Serializer
pub trait Writer {
    /// Writes a named scalar.
    fn write(&mut self, name: &str, value: ScalarRef<'_>) -> Result<(), Error>;

    /// Writes a named entry without a value.
    fn write_marker(&mut self, name: &str) -> Result<(), Error>;

    /// Writes an anonymous scalar, inside an array.
    fn write_value(&mut self, value: ScalarRef<'_>) -> Result<(), Error>;

    /// Opens a named scope holding entries.
    fn begin_object(&mut self, name: &str) -> Result<(), Error>;

    fn end_object(&mut self) -> Result<(), Error>;

    /// Opens a named scope holding anonymous elements.
    fn begin_array(&mut self, name: &str) -> Result<(), Error>;

    fn end_array(&mut self) -> Result<(), Error>;

    #[inline]
    fn begin_attributes(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Writes one attribute of the next entry.
    fn write_attribute(&mut self, name: &str, value: ScalarRef<'_>) -> Result<(), Error>;

    #[inline]
    fn end_attributes(&mut self) -> Result<(), Error> {
        Ok(())
    }
}
