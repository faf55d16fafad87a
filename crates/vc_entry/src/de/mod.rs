//! Repopulating an entry tree from a [`Reader`].

// -----------------------------------------------------------------------------
// Modules

mod config;
mod deserializer;
mod reader;

// -----------------------------------------------------------------------------
// Exports

pub use config::{CollectionPolicy, DeserializeReport, DeserializerConfig};
pub use deserializer::Deserializer;
pub use reader::Reader;
