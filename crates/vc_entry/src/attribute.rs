use alloc::boxed::Box;

use crate::{Name, Scalar, Slot};

// -----------------------------------------------------------------------------
// Attribute

/// A named scalar side-value attached to an [`Entry`].
///
/// Attributes are orthogonal to the entry's main value. The set of attributes
/// is fixed when the entry is built; only their values change afterwards.
///
/// # Examples
///
/// ```
/// use vc_entry::{Attribute, Entry};
///
/// let entry = Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true));
///
/// let attr = entry.attribute("ENABLE").unwrap();
/// assert_eq!(attr.name(), "ENABLE");
/// assert_eq!(attr.value().scalar().as_bool(), Some(true));
/// ```
///
/// [`Entry`]: crate::Entry
#[derive(Debug)]
pub struct Attribute<'a> {
    name: Name,
    value: Slot<'a, dyn Scalar>,
}

impl<'a> Attribute<'a> {
    /// Creates an attribute owning its value.
    #[inline]
    pub fn new(name: impl Into<Name>, value: impl Scalar) -> Self {
        Self {
            name: name.into(),
            value: Slot::Owned(Box::new(value)),
        }
    }

    /// Creates an attribute reading a value that lives elsewhere.
    #[inline]
    pub fn borrowed<T: Scalar>(name: impl Into<Name>, value: &'a T) -> Self {
        Self {
            name: name.into(),
            value: Slot::Borrowed(value),
        }
    }

    /// Creates an attribute that reads and writes a value living elsewhere.
    #[inline]
    pub fn borrowed_mut<T: Scalar>(name: impl Into<Name>, value: &'a mut T) -> Self {
        Self {
            name: name.into(),
            value: Slot::BorrowedMut(value),
        }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &dyn Scalar {
        self.value.get()
    }

    /// Returns the value mutably, or `None` if the attribute only holds a shared borrow.
    #[inline]
    pub fn value_mut(&mut self) -> Option<&mut dyn Scalar> {
        self.value.get_mut().map(|value| value as &mut dyn Scalar)
    }

    /// Returns `true` if the value can be written through this attribute.
    #[inline]
    pub fn is_mutable(&self) -> bool {
        self.value.is_mutable()
    }

    #[inline]
    pub(crate) fn parts_mut(&mut self) -> (&Name, Option<&mut dyn Scalar>) {
        (
            &self.name,
            self.value.get_mut().map(|value| value as &mut dyn Scalar),
        )
    }
}
