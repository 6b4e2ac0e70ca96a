//! Configuration for collections.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::schema::ShapeKind;

/// Configuration for a [`Collection`](crate::Collection).
///
/// Controls which record types may join the collection and whether
/// writes that leave a value unchanged still produce change events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollectionConfig {
    /// Only records whose schema is or extends this type may be added.
    pub base_type: Option<String>,

    /// Suppress attribute events whose new value equals the old one.
    pub skip_unchanged_writes: bool,
}

impl CollectionConfig {
    /// Creates the default configuration: any type, every write reported.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for collections of geometric shapes.
    #[must_use]
    pub fn geometric() -> Self {
        Self {
            base_type: Some(ShapeKind::Geometric.type_tag().to_string()),
            ..Self::default()
        }
    }

    /// Builder method to set the base type.
    #[must_use]
    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    /// Builder method to set dirty-checking of writes.
    #[must_use]
    pub fn with_skip_unchanged_writes(mut self, skip: bool) -> Self {
        self.skip_unchanged_writes = skip;
        self
    }
}
