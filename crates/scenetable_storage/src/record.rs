//! Records: typed attribute values under an immutable id.

use std::fmt;
use std::sync::Arc;

use scenetable_foundation::{Error, ID_COLUMN, LtVec, RecordId, Result, Value};

use crate::schema::{ShapeKind, ShapeSchema};

/// A record of one shape type.
///
/// Attribute values are stored in schema order. Every write is validated
/// against the attribute's declared type; a failed write leaves the prior
/// value in place. Cloning is O(1).
#[derive(Clone)]
pub struct Record {
    id: RecordId,
    schema: Arc<ShapeSchema>,
    values: LtVec<Value>,
}

impl Record {
    /// Creates a record with all defaults and the default id.
    #[must_use]
    pub fn new(schema: Arc<ShapeSchema>) -> Self {
        Self::with_id(schema, RecordId::default())
    }

    /// Creates a record with all defaults and the given id.
    #[must_use]
    pub fn with_id(schema: Arc<ShapeSchema>, id: RecordId) -> Self {
        let values = schema.defaults().cloned().collect();
        Self { id, schema, values }
    }

    /// Creates a record of a built-in kind.
    #[must_use]
    pub fn of(kind: ShapeKind, id: impl Into<RecordId>) -> Self {
        Self::with_id(Arc::new(kind.schema()), id.into())
    }

    /// Builder form of [`Record::set`].
    ///
    /// # Errors
    ///
    /// Fails as [`Record::set`] does.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// The record's id.
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Canonical type tag of the record's schema.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        &self.schema.type_tag
    }

    /// The record's schema.
    #[must_use]
    pub fn schema(&self) -> &Arc<ShapeSchema> {
        &self.schema
    }

    /// Returns true if the record carries attribute `name` (including `id`).
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        name == ID_COLUMN || self.schema.index_of(name).is_some()
    }

    /// Reads an attribute; `id` reads the record id.
    ///
    /// # Errors
    ///
    /// Returns a schema mismatch error if the schema does not declare `name`.
    pub fn get(&self, name: &str) -> Result<&Value> {
        if name == ID_COLUMN {
            return Ok(self.id.value());
        }
        self.schema
            .index_of(name)
            .and_then(|index| self.values.get(index))
            .ok_or_else(|| self.mismatch(name))
    }

    /// Validates and writes an attribute, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns a schema mismatch error for undeclared attributes and a
    /// validation error for rejected values or any attempt to change the id.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Value> {
        let value = value.into();
        if name == ID_COLUMN {
            return Err(
                Error::validation(ID_COLUMN, value, "record ids are immutable").with_record(&self.id)
            );
        }
        let index = self.schema.index_of(name).ok_or_else(|| self.mismatch(name))?;
        let attribute = &self.schema.attributes()[index];
        let coerced = attribute
            .ty
            .coerce(name, &value)
            .map_err(|e| e.with_record(&self.id))?;

        let old = self.values.get(index).cloned().unwrap_or(Value::Nil);
        if let Some(values) = self.values.update(index, coerced) {
            self.values = values;
        }
        Ok(old)
    }

    /// Attribute names and values in schema order, excluding `id`.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .attributes()
            .iter()
            .zip(self.values.iter())
            .map(|(a, v)| (a.name.as_str(), v))
    }

    fn mismatch(&self, name: &str) -> Error {
        Error::schema_mismatch(self.type_tag(), name).with_record(&self.id)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.type_tag() == other.type_tag() && self.values == other.values
    }
}

impl Eq for Record {}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.schema.name);
        s.field("id", &self.id);
        for (name, value) in self.attributes() {
            s.field(name, value);
        }
        s.finish()
    }
}
