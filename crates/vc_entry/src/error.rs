use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt::Display;

use thiserror::Error;

use crate::{Name, ScalarError};

// -----------------------------------------------------------------------------
// Error

/// Failures surfaced while walking a tree through a [`Writer`] or a [`Reader`].
///
/// Non-fatal conditions (an input name that matches no entry, an absent value)
/// are never reported through this type; see [`DeserializeReport`].
///
/// [`Writer`]: crate::Writer
/// [`Reader`]: crate::Reader
/// [`DeserializeReport`]: crate::de::DeserializeReport
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("entry `{0}` holds a shared borrow and cannot be written to")]
    ReadOnly(Name),

    #[error(transparent)]
    Scalar(#[from] ScalarError),

    #[cfg(feature = "std")]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Backend(String),

    #[error("at `{path}`: {source}")]
    At {
        path: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a backend error from any message.
    #[cold]
    #[inline(never)]
    pub fn backend(msg: impl Display) -> Self {
        Self::Backend(msg.to_string())
    }

    /// Returns the innermost error, skipping the path context.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::At { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
