//! Registry resolving type tags to shape schemas.

use std::collections::HashMap;
use std::sync::Arc;

use scenetable_foundation::{Error, ErrorContext, Result};

use crate::schema::{ShapeKind, ShapeSchema};

/// Maps type tags (canonical and short-name aliases) to schemas.
///
/// Built once at startup. Resolution failures are hard errors; there is no
/// fallback type.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    schemas: Vec<Arc<ShapeSchema>>,
    by_tag: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every [`ShapeKind`].
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in ShapeKind::ALL {
            registry.insert(kind.schema());
        }
        registry
    }

    /// Registers a schema under its type tag and short name.
    ///
    /// Defaults are validated and stored in coerced form.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag or short name is already registered, if
    /// the parent type is unknown, or if a default fails its attribute type.
    pub fn register(&mut self, schema: ShapeSchema) -> Result<Arc<ShapeSchema>> {
        let context = || ErrorContext::new().with_operation("register schema");

        for tag in [&schema.type_tag, &schema.name] {
            if self.by_tag.contains_key(tag) {
                return Err(Error::unknown_type(tag.as_str(), "already registered")
                    .with_context(context()));
            }
        }
        if let Some(parent) = &schema.parent {
            if !self.by_tag.contains_key(parent) {
                return Err(
                    Error::unknown_type(parent.as_str(), "parent type is not registered")
                        .with_context(context()),
                );
            }
        }

        let mut schema = schema;
        let coerced = schema
            .attributes()
            .iter()
            .map(|a| a.ty.coerce(&a.name, &a.default).map(|d| (a.clone(), d)))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.with_context(context()))?;
        for (mut attribute, default) in coerced {
            attribute.default = default;
            schema = schema.with_attribute(attribute);
        }

        Ok(self.insert(schema))
    }

    fn insert(&mut self, schema: ShapeSchema) -> Arc<ShapeSchema> {
        let schema = Arc::new(schema);
        let index = self.schemas.len();
        self.by_tag.insert(schema.type_tag.clone(), index);
        self.by_tag.insert(schema.name.clone(), index);
        self.schemas.push(Arc::clone(&schema));
        schema
    }

    /// Resolves a canonical tag or short name.
    ///
    /// # Errors
    ///
    /// Returns an unknown type error if nothing is registered under `tag`.
    pub fn resolve(&self, tag: &str) -> Result<Arc<ShapeSchema>> {
        self.get(tag)
            .cloned()
            .ok_or_else(|| Error::unknown_type(tag, "no such type is registered"))
    }

    /// Looks up a schema without failing.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&Arc<ShapeSchema>> {
        self.by_tag.get(tag).map(|&i| &self.schemas[i])
    }

    /// Returns true if `tag` resolves.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Canonical tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.type_tag.as_str())
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
