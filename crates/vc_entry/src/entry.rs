use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use crate::{Attribute, Name, Node, Scalar};

// -----------------------------------------------------------------------------
// Slot

/// Storage for a value held by an [`Entry`] or an [`Attribute`].
///
/// Values built together with the tree are owned. Values that live in caller
/// state (typically the fields of an [`Object`]) are held through a borrow, so
/// the walkers read and write them in place:
///
/// - [`Borrowed`](Slot::Borrowed) is enough for serialization,
/// - [`BorrowedMut`](Slot::BorrowedMut) is required for deserialization.
///
/// [`Object`]: crate::Object
pub enum Slot<'a, T: ?Sized> {
    Owned(Box<T>),
    Borrowed(&'a T),
    BorrowedMut(&'a mut T),
}

impl<T: ?Sized> Slot<'_, T> {
    /// Returns the value.
    #[inline]
    pub fn get(&self) -> &T {
        match self {
            Self::Owned(value) => value,
            Self::Borrowed(value) => value,
            Self::BorrowedMut(value) => value,
        }
    }

    /// Returns the value mutably, or `None` for a shared borrow.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Owned(value) => Some(&mut **value),
            Self::Borrowed(_) => None,
            Self::BorrowedMut(value) => Some(&mut **value),
        }
    }

    /// Returns `true` unless the slot holds a shared borrow.
    #[inline]
    pub fn is_mutable(&self) -> bool {
        !matches!(self, Self::Borrowed(_))
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Slot<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.get(), f)
    }
}

// -----------------------------------------------------------------------------
// Value

/// The shape of an entry value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Tuple,
    Collection,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scalar => "scalar",
            Self::Tuple => "tuple",
            Self::Collection => "collection",
            Self::Object => "object",
        })
    }
}

/// The value of an [`Entry`].
///
/// A tuple is a fixed, heterogeneous sequence of child entries; every other
/// shape is a [`Node`] whose [`NodeRef`] tells scalars, collections and
/// objects apart.
///
/// [`NodeRef`]: crate::NodeRef
#[derive(Debug)]
pub enum Value<'a> {
    Tuple(Box<[Entry<'a>]>),
    Node(Slot<'a, dyn Node>),
}

impl Value<'_> {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Tuple(_) => ValueKind::Tuple,
            Self::Node(slot) => slot.get().kind(),
        }
    }
}

// -----------------------------------------------------------------------------
// Entry

/// A named tree node: a [`Value`] plus zero or more [`Attribute`]s.
///
/// A tree is built bottom-up and its structure is fixed from then on: names,
/// tuple arity and attribute sets never change. Serialization reads values,
/// deserialization only writes scalar contents and grows collections.
///
/// Ownership is a strict tree; dropping the root releases everything it owns.
///
/// # Examples
///
/// ```
/// use vc_entry::{Attribute, Entry, ValueKind};
///
/// let tree = Entry::tuple("Root", [
///     Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
///     Entry::string("Str", "Test"),
///     Entry::new("Vec", Vec::<i32>::new()),
///     Entry::tuple("Child", [Entry::new("Bool", true)]),
/// ]);
///
/// assert_eq!(tree.kind(), ValueKind::Tuple);
/// assert_eq!(tree.children().unwrap().len(), 4);
/// assert_eq!(tree.child("Vec").unwrap().kind(), ValueKind::Collection);
/// ```
#[derive(Debug)]
pub struct Entry<'a> {
    name: Name,
    value: Value<'a>,
    attributes: Box<[Attribute<'a>]>,
}

impl<'a> Entry<'a> {
    /// Creates an entry from a raw [`Value`].
    #[inline]
    pub fn from_value(name: impl Into<Name>, value: Value<'a>) -> Self {
        Self {
            name: name.into(),
            value,
            attributes: Box::new([]),
        }
    }

    /// Creates an entry owning a scalar, collection or object value.
    #[inline]
    pub fn new(name: impl Into<Name>, value: impl Node) -> Self {
        Self::from_value(name, Value::Node(Slot::Owned(Box::new(value))))
    }

    /// Creates an entry owning a `String` value.
    #[inline]
    pub fn string(name: impl Into<Name>, value: impl Into<String>) -> Self {
        Self::new(name, value.into())
    }

    /// Creates a tuple entry from its children, in declaration order.
    #[inline]
    pub fn tuple(name: impl Into<Name>, children: impl IntoIterator<Item = Entry<'a>>) -> Self {
        Self::from_value(name, Value::Tuple(children.into_iter().collect()))
    }

    /// Creates an entry reading a value that lives elsewhere.
    #[inline]
    pub fn borrowed<T: Node>(name: impl Into<Name>, value: &'a T) -> Self {
        Self::from_value(name, Value::Node(Slot::Borrowed(value)))
    }

    /// Creates an entry that reads and writes a value living elsewhere.
    #[inline]
    pub fn borrowed_mut<T: Node>(name: impl Into<Name>, value: &'a mut T) -> Self {
        Self::from_value(name, Value::Node(Slot::BorrowedMut(value)))
    }

    /// Attaches an attribute. Only meant for construction.
    pub fn with_attribute(self, attribute: Attribute<'a>) -> Self {
        self.with_attributes([attribute])
    }

    /// Attaches several attributes, in order. Only meant for construction.
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Attribute<'a>>) -> Self {
        let mut all: Vec<Attribute<'a>> = self.attributes.into_vec();
        all.extend(attributes);
        self.attributes = all.into_boxed_slice();
        self
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &Value<'a> {
        &self.value
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Returns the node value, or `None` for a tuple.
    #[inline]
    pub fn node(&self) -> Option<&dyn Node> {
        match &self.value {
            Value::Node(slot) => Some(slot.get()),
            Value::Tuple(_) => None,
        }
    }

    /// Returns the node value mutably, or `None` for a tuple or a shared borrow.
    #[inline]
    pub fn node_mut(&mut self) -> Option<&mut dyn Node> {
        match &mut self.value {
            Value::Node(slot) => slot.get_mut().map(|node| node as &mut dyn Node),
            Value::Tuple(_) => None,
        }
    }

    /// Returns the children of a tuple entry.
    #[inline]
    pub fn children(&self) -> Option<&[Entry<'a>]> {
        match &self.value {
            Value::Tuple(children) => Some(children),
            Value::Node(_) => None,
        }
    }

    #[inline]
    pub(crate) fn children_mut(&mut self) -> Option<&mut [Entry<'a>]> {
        match &mut self.value {
            Value::Tuple(children) => Some(children),
            Value::Node(_) => None,
        }
    }

    /// Returns the first child named `name`.
    pub fn child(&self, name: &str) -> Option<&Entry<'a>> {
        self.children()?.iter().find(|child| child.name == *name)
    }

    /// Returns a value handle on the first child named `name`.
    pub fn child_mut(&mut self, name: &str) -> Option<EntryMut<'_, 'a>> {
        self.children_mut()?
            .iter_mut()
            .find(|child| child.name == *name)
            .map(EntryMut)
    }

    #[inline]
    pub fn attributes(&self) -> &[Attribute<'a>] {
        &self.attributes
    }

    /// Returns the first attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&Attribute<'a>> {
        self.attributes.iter().find(|attr| *attr.name() == *name)
    }

    #[inline]
    pub(crate) fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute<'a>> {
        self.attributes
            .iter_mut()
            .find(|attr| *attr.name() == *name)
    }

    /// Returns the value of the first attribute named `name` mutably.
    ///
    /// Returns `None` if there is no such attribute or it holds a shared borrow.
    pub fn attribute_value_mut(&mut self, name: &str) -> Option<&mut dyn Scalar> {
        self.attribute_mut(name)?.value_mut()
    }

    /// Splits the entry into disjoint borrows of its parts.
    #[inline]
    pub(crate) fn parts_mut(&mut self) -> (&Name, &mut Value<'a>, &mut [Attribute<'a>]) {
        (&self.name, &mut self.value, &mut self.attributes)
    }
}

// -----------------------------------------------------------------------------
// EntryMut

/// Write access to the values below an [`Entry`], never to its structure.
///
/// Dereferences to the entry for reading. Names, tuple children and
/// attribute sets stay as built; only scalar contents, collections and
/// objects reachable through [`node_mut`] can change.
///
/// [`node_mut`]: EntryMut::node_mut
#[derive(Debug)]
pub struct EntryMut<'r, 'e>(&'r mut Entry<'e>);

impl<'r, 'e> EntryMut<'r, 'e> {
    #[inline]
    pub(crate) fn new(entry: &'r mut Entry<'e>) -> Self {
        Self(entry)
    }

    /// Returns the node value mutably, or `None` for a tuple or a shared borrow.
    #[inline]
    pub fn node_mut(&mut self) -> Option<&mut dyn Node> {
        self.0.node_mut()
    }

    /// Like [`node_mut`](EntryMut::node_mut), keeping the full borrow.
    #[inline]
    pub fn into_node_mut(self) -> Option<&'r mut dyn Node> {
        self.0.node_mut()
    }

    /// Returns a handle on the first child named `name`.
    #[inline]
    pub fn child_mut(&mut self, name: &str) -> Option<EntryMut<'_, 'e>> {
        self.0.child_mut(name)
    }

    /// Returns the value of the first attribute named `name` mutably.
    #[inline]
    pub fn attribute_value_mut(&mut self, name: &str) -> Option<&mut dyn Scalar> {
        self.0.attribute_value_mut(name)
    }
}

impl<'e> Deref for EntryMut<'_, 'e> {
    type Target = Entry<'e>;

    #[inline]
    fn deref(&self) -> &Entry<'e> {
        self.0
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::{Entry, ValueKind};
    use crate::{Attribute, Name};

    #[test]
    fn first_declared_sibling_wins() {
        let tree = Entry::tuple("Root", [
            Entry::new("dup", 1_i32),
            Entry::new("dup", 2_i32),
        ]);

        for _ in 0..3 {
            let node = tree.child("dup").unwrap().node().unwrap();
            assert_eq!(node.downcast_ref::<i32>(), Some(&1));
        }
    }

    #[test]
    fn first_declared_attribute_wins() {
        let entry = Entry::new("Int", 0_u8).with_attributes([
            Attribute::new("A", 1_i32),
            Attribute::new("A", 2_i32),
        ]);

        let attr = entry.attribute("A").unwrap();
        assert_eq!(attr.value().scalar().as_i64(), Some(1));
        assert_eq!(entry.attributes().len(), 2);
    }

    #[test]
    fn shapes() {
        #[derive(Debug, Default)]
        struct Empty;

        impl crate::Object for Empty {
            fn entry_name(&self) -> &str {
                "Empty"
            }

            fn serialize(&self, _: &mut crate::Serializer<'_>) -> Result<(), crate::Error> {
                Ok(())
            }

            fn deserialize(&mut self, _: &mut crate::Deserializer<'_>) -> Result<(), crate::Error> {
                Ok(())
            }
        }

        assert_eq!(Entry::string("s", "x").kind(), ValueKind::Scalar);
        assert_eq!(Entry::new("v", Vec::<String>::new()).kind(), ValueKind::Collection);
        assert_eq!(Entry::new("o", Empty).kind(), ValueKind::Object);
        assert_eq!(Entry::tuple("t", []).kind(), ValueKind::Tuple);
    }

    #[test]
    fn handles_write_values_but_keep_structure() {
        let mut tree = Entry::tuple("Root", [
            Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
            Entry::tuple("Child", [Entry::new("Bool", true)]),
        ]);

        let mut int = tree.child_mut("Int").unwrap();
        *int.node_mut().unwrap().downcast_mut::<i32>().unwrap() = 7;
        int.attribute_value_mut("ENABLE").unwrap().set_text("false").unwrap();
        assert!(int.attribute_value_mut("MISSING").is_none());

        let mut child = tree.child_mut("Child").unwrap();
        assert!(child.node_mut().is_none());
        let node = child.child_mut("Bool").unwrap().into_node_mut().unwrap();
        *node.downcast_mut::<bool>().unwrap() = false;

        let names: Vec<&Name> = tree.children().unwrap().iter().map(Entry::name).collect();
        assert_eq!(names, ["Int", "Child"]);

        let int = tree.child("Int").unwrap();
        assert_eq!(int.kind(), ValueKind::Scalar);
        assert_eq!(int.node().unwrap().downcast_ref::<i32>(), Some(&7));
        assert_eq!(int.attributes().len(), 1);
        assert_eq!(*int.attributes()[0].name(), "ENABLE");
        assert_eq!(int.attributes()[0].value().scalar().as_bool(), Some(false));

        let child = tree.child("Child").unwrap();
        assert_eq!(child.kind(), ValueKind::Tuple);
        assert_eq!(child.children().unwrap().len(), 1);
        let node = child.child("Bool").unwrap().node().unwrap();
        assert_eq!(node.downcast_ref::<bool>(), Some(&false));
    }

    #[test]
    fn shared_borrow_is_read_only() {
        let value = 3_i64;
        let mut entry = Entry::borrowed("x", &value);
        assert!(entry.node().is_some());
        assert!(entry.node_mut().is_none());

        let mut target = 3_i64;
        let mut entry = Entry::borrowed_mut("x", &mut target);
        *entry.node_mut().unwrap().downcast_mut::<i64>().unwrap() = 9;
        drop(entry);
        assert_eq!(target, 9);
    }
}
