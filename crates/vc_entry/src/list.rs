use alloc::vec::Vec;
use core::any::Any;
use core::iter::FusedIterator;

use crate::{Node, NodeMut, NodeRef};

// -----------------------------------------------------------------------------
// List

/// A homogeneous, growable, ordered sequence of [`Node`]s.
///
/// This is the collection shape of an entry value. Deserialization appends
/// freshly created elements through [`push_default`](List::push_default),
/// so the element type must know how to build an empty value.
///
/// # Examples
///
/// ```
/// use vc_entry::{List, Node};
///
/// let mut vec = vec![1_i32, 2];
/// let list: &mut dyn List = &mut vec;
///
/// *list.push_default().downcast_mut::<i32>().unwrap() = 3;
/// assert_eq!(list.len(), 3);
/// assert_eq!(list.get(2).unwrap().downcast_ref::<i32>(), Some(&3));
///
/// assert_eq!(vec, [1, 2, 3]);
/// ```
pub trait List: Node {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns a reference to the element at `index`, or `None` if out of bounds.
    fn get(&self, index: usize) -> Option<&dyn Node>;

    /// Returns a mutable reference to the element at `index`, or `None` if out of bounds.
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Node>;

    /// Appends a default element and returns it for in-place population.
    fn push_default(&mut self) -> &mut dyn Node;

    /// Removes the last element, returning `false` if the list was empty.
    fn pop(&mut self) -> bool;

    /// Removes every element.
    fn clear(&mut self);

    /// Returns `true` if the list holds no element.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the elements in stored order.
    #[inline]
    fn iter(&self) -> ListIter<'_> {
        ListIter::new(self.as_list())
    }

    fn as_list(&self) -> &dyn List;
}

// -----------------------------------------------------------------------------
// Iterator

/// An iterator over the elements of a [`List`].
pub struct ListIter<'a> {
    list: &'a dyn List,
    index: usize,
}

impl<'a> ListIter<'a> {
    #[inline]
    pub fn new(list: &'a dyn List) -> Self {
        Self { list, index: 0 }
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a dyn Node;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let value = self.list.get(self.index);
        self.index += value.is_some() as usize;
        value
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let hint = self.list.len() - self.index;
        (hint, Some(hint))
    }
}

impl ExactSizeIterator for ListIter<'_> {}

impl FusedIterator for ListIter<'_> {}

// -----------------------------------------------------------------------------
// Vec implementation

impl<T: Node + Default> Node for Vec<T> {
    #[inline]
    fn node_ref(&self) -> NodeRef<'_> {
        NodeRef::List(self)
    }

    #[inline]
    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::List(self)
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

impl<T: Node + Default> List for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Node> {
        <[T]>::get(self, index).map(|value| value as &dyn Node)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Node> {
        <[T]>::get_mut(self, index).map(|value| value as &mut dyn Node)
    }

    fn push_default(&mut self) -> &mut dyn Node {
        self.push(T::default());
        let last = Vec::len(self) - 1;
        &mut self[last]
    }

    #[inline]
    fn pop(&mut self) -> bool {
        Vec::pop(self).is_some()
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }

    #[inline]
    fn as_list(&self) -> &dyn List {
        self
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::List;
    use crate::{Node, ValueKind};

    #[test]
    fn iter_in_stored_order() {
        let values = vec![3_u8, 1, 2];
        let collected: Vec<u8> = List::iter(&values)
            .map(|node| *node.downcast_ref::<u8>().unwrap())
            .collect();
        assert_eq!(collected, [3, 1, 2]);
        assert_eq!(List::iter(&values).len(), 3);
    }

    #[test]
    fn nested_lists_are_collections() {
        let mut nested: Vec<Vec<i32>> = Vec::new();
        assert_eq!(nested.kind(), ValueKind::Collection);

        let inner = nested.push_default();
        assert_eq!(inner.kind(), ValueKind::Collection);
        assert!(List::pop(&mut nested));
        assert!(!List::pop(&mut nested));
    }
}
