//! Externalizing an entry tree through a [`Writer`].

// -----------------------------------------------------------------------------
// Modules

mod serializer;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use serializer::{ELEMENT_NAME, Serializer};
pub use writer::Writer;
