//! Path-based access to the values of an entry tree.
//!
//! A path addresses a descendant entry by name, or one of its attributes:
//!
//! - segments are separated by `/`,
//! - the first segment must be the name of the root entry,
//! - every following segment names a child of the tuple reached so far,
//! - a final segment starting with `@` names an attribute of the entry
//!   reached so far.
//!
//! Siblings are tried in declaration order and the first name match is taken,
//! both for children and for attributes.
//!
//! There are two complementary APIs:
//!
//! - [`EntryPath`]: parsed once, reusable for repeated queries.
//! - [`EntryPathAccess`]: implemented for [`Entry`], parses the path on each
//!   call without copying it.
//!
//! A path that does not match the tree surfaces as a [`PathAccessError`]. The
//! tree's shape is fixed at construction, so such a mismatch is a bug in the
//! calling code; [`EntryPathAccess::resolve`] and
//! [`EntryPathAccess::resolve_mut`] panic instead of returning it.
//!
//! # Examples
//!
//! ```
//! use vc_entry::{Attribute, Entry};
//! use vc_entry::access::EntryPathAccess;
//!
//! let mut tree = Entry::tuple("Root", [
//!     Entry::new("Int", 5_i32).with_attribute(Attribute::new("ENABLE", true)),
//!     Entry::string("Str", "Test"),
//!     Entry::tuple("Child", [Entry::new("Bool", true)]),
//! ]);
//!
//! *tree.resolve_mut::<bool>("Root/Child/Bool") = false;
//! *tree.resolve_mut::<bool>("Root/Int/@ENABLE") = false;
//!
//! assert_eq!(*tree.resolve::<i32>("Root/Int"), 5);
//! assert_eq!(tree.resolve::<String>("Root/Str"), "Test");
//! ```
//!
//! [`Entry`]: crate::Entry

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod path;
mod path_access;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{AccessError, AccessErrorKind};
pub use path::{ParseError, Segment, SegmentKind, Segments};
pub use path_access::{EntryPath, EntryPathAccess, Located, PathAccessError};
