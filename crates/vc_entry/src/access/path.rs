//! Path grammar: segments and their parser.

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;
use core::iter::FusedIterator;

// -----------------------------------------------------------------------------
// ParseError

/// An error produced while splitting a path string into segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError<'a> {
    /// Position in `path`.
    pub offset: usize,
    /// The path that the error occurred in.
    pub path: &'a str,
    /// The underlying error.
    pub error: Cow<'a, str>,
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encountered an error at offset {} while parsing `{}`: {}",
            self.offset, self.path, self.error,
        )
    }
}

impl core::error::Error for ParseError<'_> {}

impl<'a> ParseError<'a> {
    #[cold]
    fn new(path: &'a str, offset: usize, error: &'static str) -> Self {
        Self {
            offset,
            path,
            error: Cow::Borrowed(error),
        }
    }
}

// -----------------------------------------------------------------------------
// Segment

/// What a [`Segment`] addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SegmentKind {
    /// A child entry, matched by name among the siblings of a tuple.
    ///
    /// Example: the `Child` of `Root/Child`.
    Entry,
    /// An attribute of the entry reached so far. Only valid as the last segment.
    ///
    /// Example: the `ENABLE` of `Root/Int/@ENABLE`.
    Attribute,
}

/// A single `/`-delimited step of a path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment<'a> {
    kind: SegmentKind,
    name: Cow<'a, str>,
    /// Only used to display error messages.
    offset: usize,
}

impl<'a> Segment<'a> {
    #[inline]
    pub fn new(kind: SegmentKind, name: impl Into<Cow<'a, str>>, offset: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            offset,
        }
    }

    #[inline]
    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// Returns the name, without the `@` prefix of attribute segments.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the byte offset of the segment in its path string.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Converts this into an "owned" value.
    #[inline]
    pub fn into_owned(self) -> Segment<'static> {
        Segment {
            kind: self.kind,
            name: Cow::Owned(String::from(self.name)),
            offset: self.offset,
        }
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SegmentKind::Entry => f.write_str(&self.name),
            SegmentKind::Attribute => write!(f, "@{}", self.name),
        }
    }
}

// -----------------------------------------------------------------------------
// Parser

/// Splits a path string into [`Segment`]s, lazily.
///
/// The grammar is:
///
/// - segments are separated by `/` and may not be empty,
/// - the first segment names the root entry,
/// - a segment starting with `@` names an attribute and must be the last one.
///
/// The iterator stops after the first error.
///
/// # Examples
///
/// ```
/// use vc_entry::access::{SegmentKind, Segments};
///
/// let segments: Vec<_> = Segments::new("Root/Int/@ENABLE")
///     .map(|res| res.unwrap())
///     .collect();
///
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[1].name(), "Int");
/// assert_eq!(segments[2].kind(), SegmentKind::Attribute);
/// assert_eq!(segments[2].name(), "ENABLE");
///
/// assert!(Segments::new("Root//Int").any(|res| res.is_err()));
/// ```
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    path: &'a str,
    offset: usize,
    done: bool,
}

impl<'a> Segments<'a> {
    #[inline]
    pub const fn new(path: &'a str) -> Self {
        Self {
            path,
            offset: 0,
            done: false,
        }
    }

    #[cold]
    fn fail(
        &mut self,
        offset: usize,
        error: &'static str,
    ) -> Option<Result<Segment<'a>, ParseError<'a>>> {
        self.done = true;
        Some(Err(ParseError::new(self.path, offset, error)))
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Result<Segment<'a>, ParseError<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let path = self.path;
        let start = self.offset;
        let rest = &path[start..];

        let (text, has_more) = match rest.find('/') {
            Some(end) => (&rest[..end], true),
            None => (rest, false),
        };

        if has_more {
            self.offset += text.len() + 1;
        } else {
            self.done = true;
        }

        if text.is_empty() {
            let error = if path.is_empty() { "empty path" } else { "empty segment" };
            return self.fail(start, error);
        }

        let Some(name) = text.strip_prefix('@') else {
            return Some(Ok(Segment::new(SegmentKind::Entry, text, start)));
        };

        if start == 0 {
            return self.fail(start, "the root segment cannot address an attribute");
        }
        if has_more {
            return self.fail(start, "an attribute segment must be the last one");
        }
        if name.is_empty() {
            return self.fail(start, "empty attribute name");
        }

        Some(Ok(Segment::new(SegmentKind::Attribute, name, start)))
    }
}

impl FusedIterator for Segments<'_> {}

// -----------------------------------------------------------------------------
// Tests
