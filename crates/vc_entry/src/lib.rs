#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod attribute;
mod entry;
mod error;
mod list;
mod name;
mod node;
mod object;
mod scalar;
mod trail;

pub mod access;
pub mod de;
pub mod ser;

#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use attribute::Attribute;
pub use entry::{Entry, EntryMut, Slot, Value, ValueKind};
pub use error::Error;
pub use list::{List, ListIter};
pub use name::Name;
pub use node::{Node, NodeMut, NodeRef};
pub use object::Object;
pub use scalar::{Scalar, ScalarError, ScalarKind, ScalarRef};

pub use de::{Deserializer, Reader};
pub use ser::{Serializer, Writer};
