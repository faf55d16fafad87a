use alloc::string::String;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// Config

/// What happens to the existing elements of a collection being deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CollectionPolicy {
    /// Keep existing elements and append the ones read.
    ///
    /// Deserializing the same input twice duplicates its elements.
    #[default]
    Append,
    /// Clear the collection before reading its elements.
    Replace,
}

/// Runtime options of a [`Deserializer`].
///
/// # Examples
///
/// ```
/// use vc_entry::de::{CollectionPolicy, DeserializerConfig};
///
/// let config = DeserializerConfig::new().with_collection_policy(CollectionPolicy::Replace);
/// assert_eq!(config.collection_policy, CollectionPolicy::Replace);
/// assert_eq!(DeserializerConfig::default().collection_policy, CollectionPolicy::Append);
/// ```
///
/// [`Deserializer`]: crate::Deserializer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeserializerConfig {
    pub collection_policy: CollectionPolicy,
}

impl DeserializerConfig {
    #[inline]
    pub const fn new() -> Self {
        Self {
            collection_policy: CollectionPolicy::Append,
        }
    }

    #[inline]
    pub const fn with_collection_policy(mut self, policy: CollectionPolicy) -> Self {
        self.collection_policy = policy;
        self
    }
}

// -----------------------------------------------------------------------------
// Report

/// The non-fatal conditions met during one deserialization.
///
/// Paths are `/`-joined entry names, with `@name` for attributes and the
/// element index for collection elements, e.g. `Root/Vec/2` or
/// `Root/Int/@ENABLE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeserializeReport {
    /// Input names that matched no entry; their input was skipped.
    pub unmatched: Vec<String>,
    /// Values and attributes absent from the input, and sequences whose input
    /// was a bare value; their targets kept their value.
    pub missing: Vec<String>,
}

impl DeserializeReport {
    /// Returns `true` if the input matched the tree exactly.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty() && self.missing.is_empty()
    }
}
