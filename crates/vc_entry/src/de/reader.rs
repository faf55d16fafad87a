use alloc::string::String;

use crate::{Error, Scalar};

/// The input side of a backend, driven by a [`Deserializer`].
///
/// The protocol is name-driven: the deserializer asks for the next entry name
/// present in the input, looks it up among the entries it was given, and then
/// asks for whatever that entry needs, attributes first.
///
/// The trait is object safe; the deserializer only sees `&mut dyn Reader`.
///
/// [`Deserializer`]: crate::Deserializer
pub trait Reader {
    /// Advances past the next entry name of the current sequence.
    ///
    /// Returns `None` at the end of the sequence.
    fn next_entry_name(&mut self) -> Result<Option<String>, Error>;

    /// Returns `true` if another element of the current collection follows.
    fn next_array_element(&mut self) -> Result<bool, Error>;

    /// Populates `target` from the input.
    ///
    /// Returns `false`, leaving `target` unchanged, if no value is available.
    fn read_value(&mut self, target: &mut dyn Scalar) -> Result<bool, Error>;

    /// Populates `target` from the attribute `name` of the current entry.
    ///
    /// Returns `false`, leaving `target` unchanged, if the attribute is absent.
    fn read_attribute(&mut self, name: &str, target: &mut dyn Scalar) -> Result<bool, Error>;

    /// Discards the input of the entry whose name was just read.
    ///
    /// Called after a name that matches no entry. Token-based backends that
    /// have nothing more to discard keep the default.
    #[inline]
    fn skip_entry(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Returns `true`, once, if the sequence that just ended held a bare
    /// value where entries or elements were expected.
    ///
    /// Asked after [`next_entry_name`] returns `None` and after
    /// [`next_array_element`] returns `false`. Backends that cannot tell
    /// keep the default.
    ///
    /// [`next_entry_name`]: Reader::next_entry_name
    /// [`next_array_element`]: Reader::next_array_element
    #[inline]
    fn take_stray_value(&mut self) -> bool {
        false
    }
}
