//! Single-segment resolution against an [`Entry`].

use core::fmt;

use crate::access::{Segment, SegmentKind};
use crate::{Attribute, Entry, Name, ValueKind};

// -----------------------------------------------------------------------------
// Error

/// The kind of [`AccessError`], along with some kind-specific information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessErrorKind {
    /// The first segment does not name the root entry.
    RootMismatch { found: Name },
    /// No child of the tuple carries the segment's name.
    MissingEntry,
    /// No attribute of the entry carries the segment's name.
    MissingAttribute,
    /// A child was requested from an entry that is not a tuple.
    NotATuple(ValueKind),
    /// The path ends on a tuple, which has no value of its own.
    NoValue,
    /// The path ends on an attribute where an entry was requested.
    NotAnEntry,
    /// The located value is a shared borrow and cannot be handed out mutably.
    ReadOnly,
}

/// An error originating from a [`Segment`] that could not be resolved.
///
/// Use the `Display` impl of this type to get information on the error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessError<'a> {
    kind: AccessErrorKind,
    segment: Segment<'a>,
}

impl<'a> AccessError<'a> {
    #[inline]
    pub fn new(kind: AccessErrorKind, segment: Segment<'a>) -> Self {
        Self { kind, segment }
    }

    /// Returns the kind of [`AccessError`].
    #[inline]
    pub fn kind(&self) -> &AccessErrorKind {
        &self.kind
    }

    /// Returns the [`Segment`] that this [`AccessError`] occurred in.
    #[inline]
    pub fn segment(&self) -> &Segment<'a> {
        &self.segment
    }

    /// Returns the offset of the failing segment in its path string.
    #[inline]
    pub fn offset(&self) -> usize {
        self.segment.offset()
    }

    /// Converts this into an "owned" value.
    #[inline]
    pub fn into_owned(self) -> AccessError<'static> {
        AccessError {
            kind: self.kind,
            segment: self.segment.into_owned(),
        }
    }
}

impl fmt::Display for AccessError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let AccessError { kind, segment } = self;

        write!(
            f,
            "Error accessing `{segment}` (offset {}): ",
            segment.offset()
        )?;

        match kind {
            AccessErrorKind::RootMismatch { found } => {
                write!(f, "the root entry is named `{found}`")
            }
            AccessErrorKind::MissingEntry => {
                write!(f, "the tuple has no child named `{}`", segment.name())
            }
            AccessErrorKind::MissingAttribute => {
                write!(f, "the entry has no attribute named `{}`", segment.name())
            }
            AccessErrorKind::NotATuple(kind) => {
                write!(f, "expected a tuple to look up a child, found a {kind}")
            }
            AccessErrorKind::NoValue => f.write_str("a tuple has no value of its own"),
            AccessErrorKind::NotAnEntry => f.write_str("expected an entry, found an attribute"),
            AccessErrorKind::ReadOnly => {
                f.write_str("the value is a shared borrow and cannot be written")
            }
        }
    }
}

impl core::error::Error for AccessError<'_> {}

// -----------------------------------------------------------------------------
// Single step

impl<'a> Segment<'a> {
    #[cold]
    #[inline(never)]
    pub(crate) fn error(&self, kind: AccessErrorKind) -> AccessError<'a> {
        AccessError::new(kind, self.clone())
    }

    /// Checks that this segment names `root`.
    pub fn check_root(&self, root: &Entry<'_>) -> Result<(), AccessError<'a>> {
        if self.kind() == SegmentKind::Entry && root.name().as_str() == self.name() {
            Ok(())
        } else {
            Err(self.error(AccessErrorKind::RootMismatch {
                found: root.name().clone(),
            }))
        }
    }

    /// Returns the first child of `entry` named like this segment.
    pub fn child<'r, 'e>(&self, entry: &'r Entry<'e>) -> Result<&'r Entry<'e>, AccessError<'a>> {
        match entry.children() {
            Some(children) => children
                .iter()
                .find(|child| child.name().as_str() == self.name())
                .ok_or_else(|| self.error(AccessErrorKind::MissingEntry)),
            None => Err(self.error(AccessErrorKind::NotATuple(entry.kind()))),
        }
    }

    pub(crate) fn child_mut<'r, 'e>(
        &self,
        entry: &'r mut Entry<'e>,
    ) -> Result<&'r mut Entry<'e>, AccessError<'a>> {
        let kind = entry.kind();
        match entry.children_mut() {
            Some(children) => children
                .iter_mut()
                .find(|child| child.name().as_str() == self.name())
                .ok_or_else(|| self.error(AccessErrorKind::MissingEntry)),
            None => Err(self.error(AccessErrorKind::NotATuple(kind))),
        }
    }

    /// Returns the first attribute of `entry` named like this segment.
    pub fn attribute<'r, 'e>(
        &self,
        entry: &'r Entry<'e>,
    ) -> Result<&'r Attribute<'e>, AccessError<'a>> {
        entry
            .attribute(self.name())
            .ok_or_else(|| self.error(AccessErrorKind::MissingAttribute))
    }

    pub(crate) fn attribute_mut<'r, 'e>(
        &self,
        entry: &'r mut Entry<'e>,
    ) -> Result<&'r mut Attribute<'e>, AccessError<'a>> {
        entry
            .attribute_mut(self.name())
            .ok_or_else(|| self.error(AccessErrorKind::MissingAttribute))
    }
}
