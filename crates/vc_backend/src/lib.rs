#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod document;
pub mod text;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use document::{Document, DocumentReader, DocumentWriter, from_document, to_document};
pub use text::{TextReader, TextWriter};
