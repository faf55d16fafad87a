//! Multi-segment path resolution.

use alloc::boxed::Box;
use core::borrow::Borrow;
use core::fmt;

use fastvec::FastVec;

use crate::access::{AccessError, AccessErrorKind, ParseError, Segment, SegmentKind, Segments};
use crate::{Attribute, Entry, EntryMut, Node, ValueKind};

// -----------------------------------------------------------------------------
// Error

/// An error returned from a failed path access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathAccessError<'a> {
    /// A path string that could not be parsed.
    /// See [`ParseError`] for details.
    Parse(ParseError<'a>),
    /// Resolution failed after parsing.
    /// See [`AccessError`] for details.
    Access(AccessError<'a>),
    /// The located value is not of the requested type.
    InvalidDowncast,
}

impl PathAccessError<'_> {
    /// Aborts with this error.
    ///
    /// A path that does not match the tree it is resolved against is a
    /// programming error, so the panicking accessors end up here.
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn handle_error(&self) -> ! {
        panic!("{self}");
    }
}

impl fmt::Display for PathAccessError<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => fmt::Display::fmt(err, f),
            Self::Access(err) => fmt::Display::fmt(err, f),
            Self::InvalidDowncast => {
                f.write_str("Can't downcast result of access to the given type")
            }
        }
    }
}

impl core::error::Error for PathAccessError<'_> {}

impl<'a> From<ParseError<'a>> for PathAccessError<'a> {
    #[inline]
    fn from(value: ParseError<'a>) -> Self {
        Self::Parse(value)
    }
}

impl<'a> From<AccessError<'a>> for PathAccessError<'a> {
    #[inline]
    fn from(value: AccessError<'a>) -> Self {
        Self::Access(value)
    }
}

// -----------------------------------------------------------------------------
// Located

/// The target of a resolved path: an entry, or one of its attributes.
#[derive(Debug, Clone, Copy)]
pub enum Located<'r, 'e> {
    Entry(&'r Entry<'e>),
    Attribute(&'r Attribute<'e>),
}

#[derive(Debug)]
enum LocatedMut<'r, 'e> {
    Entry(&'r mut Entry<'e>),
    Attribute(&'r mut Attribute<'e>),
}

#[inline(always)]
fn segment<'x, 's, S: Borrow<Segment<'s>>>(segment: &'x S) -> &'x Segment<'s> {
    <S as Borrow<Segment<'s>>>::borrow(segment)
}

#[cold]
fn empty_path<'s>() -> PathAccessError<'s> {
    PathAccessError::Parse(ParseError {
        offset: 0,
        path: "",
        error: "empty path".into(),
    })
}

/// Walks `segments` from `root`, returning the target and the last segment.
fn locate<'r, 'e, 's, S: Borrow<Segment<'s>>>(
    root: &'r Entry<'e>,
    mut segments: impl Iterator<Item = Result<S, ParseError<'s>>>,
) -> Result<(Located<'r, 'e>, S), PathAccessError<'s>> {
    let first = segments.next().ok_or_else(empty_path)??;
    segment(&first).check_root(root)?;

    let mut current = root;
    let mut last = first;
    for res in segments {
        let next = res?;
        let seg = segment(&next);
        match seg.kind() {
            SegmentKind::Entry => current = seg.child(current)?,
            SegmentKind::Attribute => {
                let attribute = seg.attribute(current)?;
                return Ok((Located::Attribute(attribute), next));
            }
        }
        last = next;
    }
    Ok((Located::Entry(current), last))
}

fn locate_mut<'r, 'e, 's, S: Borrow<Segment<'s>>>(
    root: &'r mut Entry<'e>,
    mut segments: impl Iterator<Item = Result<S, ParseError<'s>>>,
) -> Result<(LocatedMut<'r, 'e>, S), PathAccessError<'s>> {
    let first = segments.next().ok_or_else(empty_path)??;
    segment(&first).check_root(root)?;

    let mut current = root;
    let mut last = first;
    for res in segments {
        let next = res?;
        let seg = segment(&next);
        match seg.kind() {
            SegmentKind::Entry => current = seg.child_mut(current)?,
            SegmentKind::Attribute => {
                let attribute = seg.attribute_mut(current)?;
                return Ok((LocatedMut::Attribute(attribute), next));
            }
        }
        last = next;
    }
    Ok((LocatedMut::Entry(current), last))
}

fn value_of<'r, 's>(
    located: Located<'r, '_>,
    last: &Segment<'s>,
) -> Result<&'r dyn Node, AccessError<'s>> {
    match located {
        Located::Entry(entry) => entry.node().ok_or_else(|| last.error(AccessErrorKind::NoValue)),
        Located::Attribute(attribute) => Ok(attribute.value().as_node()),
    }
}

fn value_of_mut<'r, 's>(
    located: LocatedMut<'r, '_>,
    last: &Segment<'s>,
) -> Result<&'r mut dyn Node, AccessError<'s>> {
    match located {
        LocatedMut::Entry(entry) => {
            if entry.kind() == ValueKind::Tuple {
                return Err(last.error(AccessErrorKind::NoValue));
            }
            entry
                .node_mut()
                .ok_or_else(|| last.error(AccessErrorKind::ReadOnly))
        }
        LocatedMut::Attribute(attribute) => attribute
            .value_mut()
            .map(|value| value.as_node_mut())
            .ok_or_else(|| last.error(AccessErrorKind::ReadOnly)),
    }
}

fn downcast_ref<'r, 's, T: Node>(value: &'r dyn Node) -> Result<&'r T, PathAccessError<'s>> {
    match value.downcast_ref::<T>() {
        Some(value) => Ok(value),
        None => Err(PathAccessError::InvalidDowncast),
    }
}

fn downcast_mut<'r, 's, T: Node>(value: &'r mut dyn Node) -> Result<&'r mut T, PathAccessError<'s>> {
    match value.downcast_mut::<T>() {
        Some(value) => Ok(value),
        None => Err(PathAccessError::InvalidDowncast),
    }
}

// -----------------------------------------------------------------------------
// Reusable path

/// A parsed, reusable path: a thin wrapper over `Box<[Segment]>`.
///
/// Unlike [`EntryPathAccess`], the path string is parsed only once. For
/// non-static strings the segment names are copied.
///
/// # Examples
///
/// ```
/// use vc_entry::{Attribute, Entry};
/// use vc_entry::access::EntryPath;
///
/// let mut tree = Entry::tuple("Root", [
///     Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
///     Entry::tuple("Child", [Entry::new("Bool", true)]),
/// ]);
///
/// let path = EntryPath::parse_static("Root/Child/Bool").unwrap();
/// *path.access_mut_as::<bool>(&mut tree).unwrap() = false;
/// assert_eq!(*path.access_as::<bool>(&tree).unwrap(), false);
///
/// let enable = EntryPath::parse_static("Root/Int/@ENABLE").unwrap();
/// *enable.access_mut_as::<bool>(&mut tree).unwrap() = false;
/// assert_eq!(tree.child("Int").unwrap().attribute("ENABLE").unwrap().value().scalar().as_bool(), Some(false));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryPath(Box<[Segment<'static>]>);

impl EntryPath {
    /// Parses the path string and creates an [`EntryPath`].
    ///
    /// This function will create a `String` for each segment. For
    /// `&'static str`, consider using [`parse_static`](EntryPath::parse_static).
    pub fn parse(path: &str) -> Result<Self, ParseError<'_>> {
        let mut vec: FastVec<Segment, 8> = FastVec::new();
        let data = vec.data();

        for res in Segments::new(path) {
            data.push(res?.into_owned());
        }

        Ok(Self(vec.into_boxed_slice()))
    }

    /// Parses a static path; segment names borrow from it.
    pub fn parse_static(path: &'static str) -> Result<Self, ParseError<'static>> {
        let mut vec: FastVec<Segment, 8> = FastVec::new();
        let data = vec.data();

        for res in Segments::new(path) {
            data.push(res?);
        }

        Ok(Self(vec.into_boxed_slice()))
    }

    /// Returns the number of segments, root included.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vc_entry::access::EntryPath;
    /// let path = EntryPath::parse_static("Root/Int/@ENABLE").unwrap();
    /// assert_eq!(path.len(), 3);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn segments(&self) -> &[Segment<'static>] {
        &self.0
    }

    /// Returns the entry or attribute this path addresses.
    pub fn locate<'r, 'e>(
        &self,
        root: &'r Entry<'e>,
    ) -> Result<Located<'r, 'e>, PathAccessError<'static>> {
        locate(root, self.0.iter().map(Ok)).map(|(located, _)| located)
    }

    /// Returns the value this path addresses.
    ///
    /// The path itself will not change and can be reused.
    pub fn access<'r>(&self, root: &'r Entry<'_>) -> Result<&'r dyn Node, PathAccessError<'static>> {
        let (located, last) = locate(root, self.0.iter().map(Ok))?;
        Ok(value_of(located, last)?)
    }

    /// Returns the value this path addresses, mutably.
    ///
    /// Fails with [`AccessErrorKind::ReadOnly`] on a shared borrow.
    pub fn access_mut<'r>(
        &self,
        root: &'r mut Entry<'_>,
    ) -> Result<&'r mut dyn Node, PathAccessError<'static>> {
        let (located, last) = locate_mut(root, self.0.iter().map(Ok))?;
        Ok(value_of_mut(located, last)?)
    }

    /// Returns a typed reference to the value this path addresses.
    #[inline]
    pub fn access_as<'r, T: Node>(
        &self,
        root: &'r Entry<'_>,
    ) -> Result<&'r T, PathAccessError<'static>> {
        downcast_ref(self.access(root)?)
    }

    /// Returns a mutable typed reference to the value this path addresses.
    #[inline]
    pub fn access_mut_as<'r, T: Node>(
        &self,
        root: &'r mut Entry<'_>,
    ) -> Result<&'r mut T, PathAccessError<'static>> {
        downcast_mut(self.access_mut(root)?)
    }

    /// Returns the entry this path addresses.
    pub fn find_entry<'r, 'e>(
        &self,
        root: &'r Entry<'e>,
    ) -> Result<&'r Entry<'e>, PathAccessError<'static>> {
        match locate(root, self.0.iter().map(Ok))? {
            (Located::Entry(entry), _) => Ok(entry),
            (Located::Attribute(_), last) => Err(last.error(AccessErrorKind::NotAnEntry).into()),
        }
    }

    /// Returns a value handle on the entry this path addresses.
    pub fn find_entry_mut<'r, 'e>(
        &self,
        root: &'r mut Entry<'e>,
    ) -> Result<EntryMut<'r, 'e>, PathAccessError<'static>> {
        match locate_mut(root, self.0.iter().map(Ok))? {
            (LocatedMut::Entry(entry), _) => Ok(EntryMut::new(entry)),
            (LocatedMut::Attribute(_), last) => {
                Err(last.error(AccessErrorKind::NotAnEntry).into())
            }
        }
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.0.iter().enumerate() {
            if index != 0 {
                f.write_str("/")?;
            }
            fmt::Display::fmt(segment, f)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// One-shot access

/// Resolves a path string directly, without keeping the parsed form.
///
/// Nothing is copied, even for non-static strings. If a path is used more
/// than once, consider [`EntryPath`], which is parsed only once.
///
/// # Examples
///
/// ```
/// use vc_entry::{Attribute, Entry};
/// use vc_entry::access::EntryPathAccess;
///
/// let mut tree = Entry::tuple("Root", [
///     Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
///     Entry::string("Str", "Test"),
/// ]);
///
/// *tree.access_mut_as::<bool>("Root/Int/@ENABLE").unwrap() = false;
///
/// assert_eq!(*tree.access_as::<i32>("Root/Int").unwrap(), 5);
/// assert_eq!(*tree.access_as::<bool>("Root/Int/@ENABLE").unwrap(), false);
/// assert!(tree.access("Root/Missing").is_err());
/// ```
pub trait EntryPathAccess {
    /// Returns the value addressed by `path`.
    fn access<'a, 'b>(&'a self, path: &'b str) -> Result<&'a dyn Node, PathAccessError<'b>>;

    /// Returns the value addressed by `path`, mutably.
    fn access_mut<'a, 'b>(
        &'a mut self,
        path: &'b str,
    ) -> Result<&'a mut dyn Node, PathAccessError<'b>>;

    /// Returns a typed reference to the value addressed by `path`.
    fn access_as<'a, 'b, T: Node>(&'a self, path: &'b str) -> Result<&'a T, PathAccessError<'b>>;

    /// Returns a mutable typed reference to the value addressed by `path`.
    fn access_mut_as<'a, 'b, T: Node>(
        &'a mut self,
        path: &'b str,
    ) -> Result<&'a mut T, PathAccessError<'b>>;

    /// Returns the entry addressed by `path`.
    fn find_entry<'a, 'b>(&'a self, path: &'b str) -> Result<&'a Self, PathAccessError<'b>>;

    /// Like [`access_as`](EntryPathAccess::access_as), but a path that does
    /// not fit the tree is a bug.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed, does not resolve, or addresses a value
    /// of another type.
    #[track_caller]
    fn resolve<T: Node>(&self, path: &str) -> &T {
        match self.access_as::<T>(path) {
            Ok(value) => value,
            Err(err) => err.handle_error(),
        }
    }

    /// Like [`access_mut_as`](EntryPathAccess::access_mut_as), but a path
    /// that does not fit the tree is a bug.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed, does not resolve, addresses a value of
    /// another type, or addresses a shared borrow.
    #[track_caller]
    fn resolve_mut<T: Node>(&mut self, path: &str) -> &mut T {
        match self.access_mut_as::<T>(path) {
            Ok(value) => value,
            Err(err) => err.handle_error(),
        }
    }
}

impl<'e> EntryPathAccess for Entry<'e> {
    #[inline(never)]
    fn access<'a, 'b>(&'a self, path: &'b str) -> Result<&'a dyn Node, PathAccessError<'b>> {
        let (located, last) = locate(self, Segments::new(path))?;
        Ok(value_of(located, &last)?)
    }

    #[inline(never)]
    fn access_mut<'a, 'b>(
        &'a mut self,
        path: &'b str,
    ) -> Result<&'a mut dyn Node, PathAccessError<'b>> {
        let (located, last) = locate_mut(self, Segments::new(path))?;
        Ok(value_of_mut(located, &last)?)
    }

    #[inline]
    fn access_as<'a, 'b, T: Node>(&'a self, path: &'b str) -> Result<&'a T, PathAccessError<'b>> {
        // `access` is compiled once, independent of `T`.
        downcast_ref(EntryPathAccess::access(self, path)?)
    }

    #[inline]
    fn access_mut_as<'a, 'b, T: Node>(
        &'a mut self,
        path: &'b str,
    ) -> Result<&'a mut T, PathAccessError<'b>> {
        downcast_mut(EntryPathAccess::access_mut(self, path)?)
    }

    fn find_entry<'a, 'b>(&'a self, path: &'b str) -> Result<&'a Self, PathAccessError<'b>> {
        match locate(self, Segments::new(path))? {
            (Located::Entry(entry), _) => Ok(entry),
            (Located::Attribute(_), last) => Err(last.error(AccessErrorKind::NotAnEntry).into()),
        }
    }
}

impl<'e> Entry<'e> {
    /// Returns a value handle on the entry addressed by `path`.
    ///
    /// The handle writes values only; see [`EntryMut`].
    pub fn find_entry_mut<'a, 'b>(
        &'a mut self,
        path: &'b str,
    ) -> Result<EntryMut<'a, 'e>, PathAccessError<'b>> {
        match locate_mut(self, Segments::new(path))? {
            (LocatedMut::Entry(entry), _) => Ok(EntryMut::new(entry)),
            (LocatedMut::Attribute(_), last) => {
                Err(last.error(AccessErrorKind::NotAnEntry).into())
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{EntryPath, EntryPathAccess, PathAccessError};
    use crate::access::AccessErrorKind;
    use crate::{Attribute, Entry, ValueKind};

    fn sample() -> Entry<'static> {
        Entry::tuple("Root", [
            Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
            Entry::string("Str", "Test"),
            Entry::tuple("Child", [Entry::new("Bool", true)]),
            Entry::new("Vec", vec![1_u8, 2]),
        ])
    }

    fn access_kind(err: PathAccessError<'_>) -> AccessErrorKind {
        match err {
            PathAccessError::Access(err) => err.kind().clone(),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn write_through_resolved_paths() {
        let mut tree = sample();

        *tree.resolve_mut::<bool>("Root/Child/Bool") = false;
        *tree.resolve_mut::<bool>("Root/Int/@ENABLE") = false;
        tree.resolve_mut::<Vec<u8>>("Root/Vec").push(3);

        assert!(!*tree.resolve::<bool>("Root/Child/Bool"));
        assert!(!*tree.resolve::<bool>("Root/Int/@ENABLE"));
        assert_eq!(*tree.resolve::<i32>("Root/Int"), 5);
        assert_eq!(tree.resolve::<Vec<u8>>("Root/Vec"), &[1, 2, 3]);
    }

    #[test]
    fn entry_handles_write_values() {
        let mut tree = sample();

        let mut int = tree.find_entry_mut("Root/Int").unwrap();
        assert_eq!(int.name().as_str(), "Int");
        *int.node_mut().unwrap().downcast_mut::<i32>().unwrap() = 9;
        int.attribute_value_mut("ENABLE").unwrap().set_text("false").unwrap();

        let path = EntryPath::parse_static("Root/Child").unwrap();
        let mut child = path.find_entry_mut(&mut tree).unwrap();
        assert!(child.node_mut().is_none());
        let node = child.child_mut("Bool").unwrap().into_node_mut().unwrap();
        *node.downcast_mut::<bool>().unwrap() = false;

        assert_eq!(*tree.resolve::<i32>("Root/Int"), 9);
        assert!(!*tree.resolve::<bool>("Root/Int/@ENABLE"));
        assert!(!*tree.resolve::<bool>("Root/Child/Bool"));
        assert_eq!(tree.find_entry("Root/Int").unwrap().attributes().len(), 1);
        assert_eq!(tree.find_entry("Root/Child").unwrap().children().unwrap().len(), 1);
    }

    #[test]
    fn first_match_wins() {
        let mut tree = Entry::tuple("Root", [
            Entry::new("dup", 1_i32).with_attributes([
                Attribute::new("A", 10_i32),
                Attribute::new("A", 20_i32),
            ]),
            Entry::new("dup", 2_i32),
        ]);

        let path = EntryPath::parse_static("Root/dup").unwrap();
        for _ in 0..3 {
            assert_eq!(*path.access_as::<i32>(&tree).unwrap(), 1);
        }

        *tree.resolve_mut::<i32>("Root/dup/@A") = 11;
        let attributes = tree.find_entry("Root/dup").unwrap().attributes();
        assert_eq!(attributes[0].value().scalar().as_i64(), Some(11));
        assert_eq!(attributes[1].value().scalar().as_i64(), Some(20));
    }

    #[test]
    fn path_not_found() {
        let mut tree = sample();

        let err = tree.access("Other/Int").unwrap_err();
        assert_eq!(
            access_kind(err),
            AccessErrorKind::RootMismatch {
                found: "Root".into()
            }
        );

        let err = tree.access("Root/Missing").unwrap_err();
        assert_eq!(access_kind(err), AccessErrorKind::MissingEntry);

        let err = tree.access("Root/Int/@MISSING").unwrap_err();
        assert_eq!(access_kind(err), AccessErrorKind::MissingAttribute);

        let err = tree.access("Root/Int/Deeper").unwrap_err();
        assert_eq!(access_kind(err), AccessErrorKind::NotATuple(ValueKind::Scalar));

        let err = tree.access_mut("Root/Child").unwrap_err();
        assert_eq!(access_kind(err), AccessErrorKind::NoValue);

        let err = tree.find_entry_mut("Root/Int/@ENABLE").unwrap_err();
        assert_eq!(access_kind(err), AccessErrorKind::NotAnEntry);

        assert!(matches!(tree.access("Root//Int"), Err(PathAccessError::Parse(_))));
        assert!(matches!(
            tree.access_as::<u64>("Root/Int"),
            Err(PathAccessError::InvalidDowncast)
        ));
    }

    #[test]
    fn shared_borrows_are_read_only() {
        let name = String::from("fixed");
        let mut tree = Entry::tuple("Root", [Entry::borrowed("Name", &name)]);

        assert_eq!(tree.resolve::<String>("Root/Name"), "fixed");
        let err = tree.access_mut("Root/Name").unwrap_err();
        assert_eq!(access_kind(err), AccessErrorKind::ReadOnly);
    }

    #[test]
    #[should_panic(expected = "no child named `Nope`")]
    fn resolve_panics_on_bad_path() {
        let tree = sample();
        let _ = tree.resolve::<i32>("Root/Nope");
    }

    #[test]
    fn path_display_round_trips() {
        let text = String::from("Root/Child/@Flag");
        let path = EntryPath::parse(&text).unwrap();
        drop(text);
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "Root/Child/@Flag");
    }
}
