use alloc::string::{String, ToString};
use core::any::type_name;
use core::fmt;

use thiserror::Error;

use crate::Node;

// -----------------------------------------------------------------------------
// ScalarRef

/// A read-only view of a scalar value, as handed to a [`Writer`].
///
/// Integers are widened to 64 bits; types formatted by the backend itself
/// (floats, user enums, ...) are exposed through [`ScalarRef::Other`].
///
/// [`Writer`]: crate::Writer
#[derive(Clone, Copy)]
pub enum ScalarRef<'a> {
    Int(i64),
    UInt(u64),
    Bool(bool),
    Str(&'a str),
    Other(&'a dyn fmt::Display),
}

/// The kind of a [`ScalarRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    UInt,
    Bool,
    Str,
    Other,
}

impl ScalarRef<'_> {
    #[inline]
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Int(_) => ScalarKind::Int,
            Self::UInt(_) => ScalarKind::UInt,
            Self::Bool(_) => ScalarKind::Bool,
            Self::Str(_) => ScalarKind::Str,
            Self::Other(_) => ScalarKind::Other,
        }
    }

    /// Returns the value if it is a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is an integer that fits.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(value) => Some(value),
            Self::UInt(value) => i64::try_from(value).ok(),
            _ => None,
        }
    }

    /// Returns the value if it is a string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => fmt::Display::fmt(value, f),
            Self::UInt(value) => fmt::Display::fmt(value, f),
            Self::Bool(value) => fmt::Display::fmt(value, f),
            Self::Str(value) => f.write_str(value),
            Self::Other(value) => fmt::Display::fmt(*value, f),
        }
    }
}

impl fmt::Debug for ScalarRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Self::UInt(value) => f.debug_tuple("UInt").field(value).finish(),
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Str(value) => f.debug_tuple("Str").field(value).finish(),
            Self::Other(value) => write!(f, "Other({value})"),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "signed integer",
            Self::UInt => "unsigned integer",
            Self::Bool => "boolean",
            Self::Str => "string",
            Self::Other => "displayable",
        })
    }
}

// -----------------------------------------------------------------------------
// Error

/// An error raised while assigning external input to a scalar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScalarError {
    #[error("cannot parse `{input}` as `{expected}`")]
    Parse {
        input: String,
        expected: &'static str,
    },

    #[error("value {value} is out of range for `{expected}`")]
    OutOfRange {
        value: String,
        expected: &'static str,
    },

    #[error("expected a {expected} value, found a {found} value")]
    Mismatch {
        expected: ScalarKind,
        found: ScalarKind,
    },
}

impl ScalarError {
    #[cold]
    pub fn parse<T: ?Sized>(input: &str) -> Self {
        Self::Parse {
            input: input.to_string(),
            expected: type_name::<T>(),
        }
    }

    #[cold]
    pub fn out_of_range<T: ?Sized>(value: impl fmt::Display) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            expected: type_name::<T>(),
        }
    }
}

// -----------------------------------------------------------------------------
// Scalar

/// A leaf value of the tree.
///
/// Scalars are what a [`Writer`] prints and what a [`Reader`] fills in.
/// Builtin implementations cover the integer types, `bool` and `String`;
/// `f32`, `f64`, `char` and user types go through [`impl_display_scalar!`].
///
/// # Examples
///
/// ```
/// use vc_entry::{Scalar, ScalarRef};
///
/// let mut value = 0_u8;
/// value.set_text("42").unwrap();
/// assert_eq!(value, 42);
///
/// assert!(value.set_scalar(ScalarRef::Int(-1)).is_err());
/// assert_eq!(value.scalar().as_i64(), Some(42));
/// ```
///
/// [`Writer`]: crate::Writer
/// [`Reader`]: crate::Reader
/// [`impl_display_scalar!`]: crate::impl_display_scalar
pub trait Scalar: Node {
    /// Returns a read-only view of the value.
    fn scalar(&self) -> ScalarRef<'_>;

    /// Replaces the value by parsing external text.
    fn set_text(&mut self, text: &str) -> Result<(), ScalarError>;

    /// Replaces the value with a typed scalar, converting where lossless.
    fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError> {
        match value {
            ScalarRef::Str(text) => self.set_text(text),
            other => self.set_text(&other.to_string()),
        }
    }

    fn as_node(&self) -> &dyn Node;

    fn as_node_mut(&mut self) -> &mut dyn Node;
}

// -----------------------------------------------------------------------------
// Builtin implementations

/// Implements [`Node`] for a scalar type.
#[doc(hidden)]
#[macro_export]
macro_rules! impl_scalar_node {
    ($ty:ty) => {
        impl $crate::Node for $ty {
            #[inline]
            fn node_ref(&self) -> $crate::NodeRef<'_> {
                $crate::NodeRef::Scalar(self)
            }

            #[inline]
            fn node_mut(&mut self) -> $crate::NodeMut<'_> {
                $crate::NodeMut::Scalar(self)
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }
        }
    };
}

macro_rules! impl_integer_scalar {
    ($variant:ident as $wide:ty => $($ty:ty),+) => {$(
        crate::impl_scalar_node!($ty);

        impl Scalar for $ty {
            #[inline]
            fn scalar(&self) -> ScalarRef<'_> {
                ScalarRef::$variant(*self as $wide)
            }

            fn set_text(&mut self, text: &str) -> Result<(), ScalarError> {
                *self = text
                    .trim()
                    .parse::<$ty>()
                    .map_err(|_| ScalarError::parse::<$ty>(text))?;
                Ok(())
            }

            fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError> {
                *self = match value {
                    ScalarRef::Int(v) => {
                        <$ty>::try_from(v).map_err(|_| ScalarError::out_of_range::<$ty>(v))?
                    }
                    ScalarRef::UInt(v) => {
                        <$ty>::try_from(v).map_err(|_| ScalarError::out_of_range::<$ty>(v))?
                    }
                    ScalarRef::Str(text) => return self.set_text(text),
                    ScalarRef::Other(other) => return self.set_text(&other.to_string()),
                    ScalarRef::Bool(_) => {
                        return Err(ScalarError::Mismatch {
                            expected: ScalarKind::$variant,
                            found: ScalarKind::Bool,
                        });
                    }
                };
                Ok(())
            }

            #[inline]
            fn as_node(&self) -> &dyn Node {
                self
            }

            #[inline]
            fn as_node_mut(&mut self) -> &mut dyn Node {
                self
            }
        }
    )+};
}

impl_integer_scalar!(Int as i64 => i8, i16, i32, i64, isize);
impl_integer_scalar!(UInt as u64 => u8, u16, u32, u64, usize);

crate::impl_scalar_node!(bool);

impl Scalar for bool {
    #[inline]
    fn scalar(&self) -> ScalarRef<'_> {
        ScalarRef::Bool(*self)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ScalarError> {
        let trimmed = text.trim();
        *self = if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
            true
        } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
            false
        } else {
            return Err(ScalarError::parse::<bool>(text));
        };
        Ok(())
    }

    fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError> {
        *self = match value {
            ScalarRef::Bool(v) => v,
            ScalarRef::Int(0) | ScalarRef::UInt(0) => false,
            ScalarRef::Int(1) | ScalarRef::UInt(1) => true,
            ScalarRef::Int(v) => return Err(ScalarError::out_of_range::<bool>(v)),
            ScalarRef::UInt(v) => return Err(ScalarError::out_of_range::<bool>(v)),
            ScalarRef::Str(text) => return self.set_text(text),
            ScalarRef::Other(other) => return self.set_text(&other.to_string()),
        };
        Ok(())
    }

    #[inline]
    fn as_node(&self) -> &dyn Node {
        self
    }

    #[inline]
    fn as_node_mut(&mut self) -> &mut dyn Node {
        self
    }
}

crate::impl_scalar_node!(String);

impl Scalar for String {
    #[inline]
    fn scalar(&self) -> ScalarRef<'_> {
        ScalarRef::Str(self)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ScalarError> {
        self.clear();
        self.push_str(text);
        Ok(())
    }

    // A string accepts every scalar through its display form.
    fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError> {
        match value {
            ScalarRef::Str(text) => self.set_text(text),
            other => {
                *self = other.to_string();
                Ok(())
            }
        }
    }

    #[inline]
    fn as_node(&self) -> &dyn Node {
        self
    }

    #[inline]
    fn as_node_mut(&mut self) -> &mut dyn Node {
        self
    }
}

/// Implements [`Scalar`] (and [`Node`]) for types that are [`Display`] and [`FromStr`].
///
/// Such values are written as [`ScalarRef::Other`] and read back by parsing
/// the text a backend provides.
///
/// # Examples
///
/// ```
/// use core::fmt;
/// use core::str::FromStr;
/// use vc_entry::{Scalar, ScalarKind, impl_display_scalar};
///
/// #[derive(Debug, PartialEq)]
/// enum Mode { Fast, Slow }
///
/// impl fmt::Display for Mode {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str(match self { Mode::Fast => "fast", Mode::Slow => "slow" })
///     }
/// }
///
/// impl FromStr for Mode {
///     type Err = ();
///     fn from_str(s: &str) -> Result<Self, ()> {
///         match s { "fast" => Ok(Mode::Fast), "slow" => Ok(Mode::Slow), _ => Err(()) }
///     }
/// }
///
/// impl_display_scalar!(Mode);
///
/// let mut mode = Mode::Fast;
/// mode.set_text("slow").unwrap();
/// assert_eq!(mode, Mode::Slow);
/// assert_eq!(mode.scalar().kind(), ScalarKind::Other);
/// ```
///
/// [`Node`]: crate::Node
/// [`Display`]: core::fmt::Display
/// [`FromStr`]: core::str::FromStr
#[macro_export]
macro_rules! impl_display_scalar {
    ($($ty:ty),+ $(,)?) => {$(
        $crate::impl_scalar_node!($ty);

        impl $crate::Scalar for $ty {
            #[inline]
            fn scalar(&self) -> $crate::ScalarRef<'_> {
                $crate::ScalarRef::Other(self)
            }

            fn set_text(&mut self, text: &str) -> ::core::result::Result<(), $crate::ScalarError> {
                match <$ty as ::core::str::FromStr>::from_str(text.trim()) {
                    ::core::result::Result::Ok(value) => {
                        *self = value;
                        ::core::result::Result::Ok(())
                    }
                    ::core::result::Result::Err(_) => {
                        ::core::result::Result::Err($crate::ScalarError::parse::<$ty>(text))
                    }
                }
            }

            #[inline]
            fn as_node(&self) -> &dyn $crate::Node {
                self
            }

            #[inline]
            fn as_node_mut(&mut self) -> &mut dyn $crate::Node {
                self
            }
        }
    )+};
}

crate::impl_display_scalar!(f32, f64, char);

// -----------------------------------------------------------------------------
// Tests
