//! A console backend: a readable dump on the way out, whitespace-separated
//! tokens on the way in.

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::{END_TOKEN, TextReader};
pub use writer::{TextWriter, TextWriterConfig};
