#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_entry as entry;

#[cfg(feature = "std")]
pub use vc_backend as backend;
