use core::any::Any;
use core::fmt;

use crate::{List, Object, Scalar, ValueKind};

// -----------------------------------------------------------------------------
// Node

/// A value that can sit inside an [`Entry`].
///
/// Each node exposes exactly one of three shapes through [`node_ref`] and
/// [`node_mut`]; the fourth shape, the tuple, only exists as an entry value.
///
/// You rarely implement this trait by hand:
///
/// - scalars come from the builtin impls or [`impl_display_scalar!`],
/// - every [`Object`] is a node,
/// - `Vec<T>` is a node whenever `T` is a node with a [`Default`].
///
/// [`Entry`]: crate::Entry
/// [`node_ref`]: Node::node_ref
/// [`node_mut`]: Node::node_mut
/// [`impl_display_scalar!`]: crate::impl_display_scalar
pub trait Node: Any + fmt::Debug {
    /// Returns a shape-specific view of the node.
    fn node_ref(&self) -> NodeRef<'_>;

    /// Returns a mutable shape-specific view of the node.
    fn node_mut(&mut self) -> NodeMut<'_>;

    /// Casts to [`Any`], for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Casts to mutable [`Any`], for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the shape of the node.
    #[inline]
    fn kind(&self) -> ValueKind {
        self.node_ref().kind()
    }
}

impl dyn Node {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Node>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_entry::Node;
    ///
    /// let value: &dyn Node = &5_i32;
    /// assert_eq!(value.downcast_ref::<i32>(), Some(&5));
    /// assert!(value.downcast_ref::<u32>().is_none());
    /// ```
    #[inline]
    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Node>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

// -----------------------------------------------------------------------------
// NodeRef / NodeMut

/// An immutable, shape-specific view of a [`Node`].
#[derive(Clone, Copy)]
pub enum NodeRef<'a> {
    Scalar(&'a dyn Scalar),
    List(&'a dyn List),
    Object(&'a dyn Object),
}

/// A mutable, shape-specific view of a [`Node`].
pub enum NodeMut<'a> {
    Scalar(&'a mut dyn Scalar),
    List(&'a mut dyn List),
    Object(&'a mut dyn Object),
}

impl NodeRef<'_> {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(_) => ValueKind::Scalar,
            Self::List(_) => ValueKind::Collection,
            Self::Object(_) => ValueKind::Object,
        }
    }
}

impl NodeMut<'_> {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(_) => ValueKind::Scalar,
            Self::List(_) => ValueKind::Collection,
            Self::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Self::List(value) => f.debug_tuple("List").field(value).finish(),
            Self::Object(value) => f.debug_tuple("Object").field(value).finish(),
        }
    }
}
