use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::{Error, Name};

/// One level of a [`Trail`]: a named entry or a collection element.
#[derive(Debug, Clone)]
pub(crate) enum Mark {
    Name(Name),
    Index(usize),
}

impl From<Name> for Mark {
    #[inline]
    fn from(name: Name) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for Mark {
    #[inline]
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// The entries and elements being walked, outermost first.
///
/// Used to build the `/`-joined paths of deserialization reports and, in
/// debug builds with the `debug` feature, to locate errors.
#[derive(Default, Clone)]
pub(crate) struct Trail {
    stack: Vec<Mark>,
}

impl Trail {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, mark: impl Into<Mark>) {
        self.stack.push(mark.into());
    }

    #[inline]
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Returns the path of the current entry.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for (depth, mark) in self.stack.iter().enumerate() {
            if depth != 0 {
                path.push('/');
            }
            match mark {
                Mark::Name(name) => path.push_str(name),
                Mark::Index(index) => path.push_str(&index.to_string()),
            }
        }
        path
    }

    /// Returns the path of `last` below the current entry.
    pub fn path_to(&self, last: &str) -> String {
        let mut path = self.path();
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(last);
        path
    }

    /// Attaches the current path to `error`, once.
    #[inline]
    pub fn wrap(&self, error: Error) -> Error {
        if cfg!(all(debug_assertions, feature = "debug"))
            && !self.stack.is_empty()
            && !matches!(error, Error::At { .. })
        {
            Error::At {
                path: self.path(),
                source: Box::new(error),
            }
        } else {
            error
        }
    }
}

impl fmt::Debug for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::Trail;
    use crate::{Error, Name};

    #[test]
    fn joins_names() {
        let mut trail = Trail::new();
        assert_eq!(trail.path_to("Root"), "Root");

        trail.push(Name::new_static("Root"));
        trail.push(Name::new_static("Int"));
        assert_eq!(trail.path(), "Root/Int");
        assert_eq!(trail.path_to("@ENABLE"), "Root/Int/@ENABLE");

        trail.pop();
        assert_eq!(trail.path(), "Root");
    }

    #[test]
    fn indices_join_like_names() {
        let mut trail = Trail::new();
        trail.push(Name::new_static("Grid"));
        trail.push(1_usize);
        trail.push(0_usize);
        assert_eq!(trail.path(), "Grid/1/0");

        trail.pop();
        assert_eq!(trail.path_to("@MIN"), "Grid/1/@MIN");
    }

    #[test]
    fn wraps_once() {
        let mut trail = Trail::new();
        trail.push(Name::new_static("Root"));

        let error = trail.wrap(trail.wrap(Error::backend("boom")));
        assert!(matches!(error.root_cause(), Error::Backend(_)));
        if let Error::At { source, .. } = &error {
            assert!(!matches!(**source, Error::At { .. }));
        }
    }
}
