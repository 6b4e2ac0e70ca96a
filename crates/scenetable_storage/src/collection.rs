//! The id-unique, insertion-ordered record collection.

use std::fmt;
use std::sync::Arc;

use scenetable_foundation::{Error, ErrorKind, LtMap, LtVec, RecordId, Result, Value};
use tracing::trace;

use crate::batch::{Batch, ChangeSummary};
use crate::config::CollectionConfig;
use crate::event::{AttributeChange, AttributeFilter, EventBus, StructuralChange, SubscriptionId};
use crate::record::Record;
use crate::registry::SchemaRegistry;
use crate::schema::ShapeSchema;

/// Records keyed by id plus their insertion order.
///
/// Both halves are persistent, so a batch stages changes on a clone and
/// commits by swapping it in.
#[derive(Clone, Default)]
pub(crate) struct State {
    pub(crate) order: LtVec<RecordId>,
    pub(crate) index: LtMap<RecordId, Record>,
}

impl State {
    pub(crate) fn get(&self, id: &RecordId) -> Option<&Record> {
        self.index.get(id)
    }

    pub(crate) fn contains(&self, id: &RecordId) -> bool {
        self.index.contains_key(id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Record> {
        self.order.iter().filter_map(|id| self.index.get(id))
    }
}

/// Selects records by attribute presence and, optionally, value.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeQuery {
    /// Attribute the record must declare.
    pub name: String,
    /// Value the attribute must equal; `None` matches any value.
    pub value: Option<Value>,
}

impl AttributeQuery {
    /// Matches records declaring attribute `name`.
    #[must_use]
    pub fn has(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Additionally requires the attribute to equal `value`.
    #[must_use]
    pub fn equal_to(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    fn matches(&self, record: &Record) -> bool {
        let Ok(current) = record.get(&self.name) else {
            return false;
        };
        let Some(wanted) = &self.value else {
            return true;
        };
        // Compare in the attribute's own representation, so 1 finds 1.0.
        match record.schema().attribute(&self.name) {
            Some(attribute) => attribute
                .ty
                .coerce(&self.name, wanted)
                .is_ok_and(|coerced| coerced == *current),
            None => wanted == current,
        }
    }
}

/// An insertion-ordered collection of records with unique ids.
///
/// All mutation goes through a [`Batch`]; the single-operation methods
/// are one-operation batches. Observers are notified after each commit.
pub struct Collection {
    pub(crate) state: State,
    registry: Arc<SchemaRegistry>,
    config: CollectionConfig,
    bus: EventBus,
    dispatching: bool,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    /// Creates an empty collection over the built-in schemas.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CollectionConfig::default())
    }

    /// Creates an empty collection with the given configuration.
    #[must_use]
    pub fn with_config(config: CollectionConfig) -> Self {
        Self::with_registry(SchemaRegistry::builtin(), config)
    }

    /// Creates an empty collection over a custom registry.
    #[must_use]
    pub fn with_registry(registry: SchemaRegistry, config: CollectionConfig) -> Self {
        Self {
            state: State::default(),
            registry: Arc::new(registry),
            config,
            bus: EventBus::new(),
            dispatching: false,
        }
    }

    /// The schema registry used to resolve type tags.
    #[must_use]
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// The collection's configuration.
    #[must_use]
    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.order.len()
    }

    /// Returns true if the collection holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.order.is_empty()
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.state.get(id)
    }

    /// Returns true if a record has the given id.
    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.state.contains(id)
    }

    /// Record ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.state.order.iter()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.state.iter()
    }

    /// Records matching `query`, in insertion order.
    #[must_use]
    pub fn query(&self, query: &AttributeQuery) -> Vec<&Record> {
        self.iter().filter(|r| query.matches(r)).collect()
    }

    /// Opens a batch. Nothing is visible to observers until it commits.
    ///
    /// # Errors
    ///
    /// Returns a re-entrant mutation error while change events are being
    /// dispatched.
    pub fn batch(&mut self) -> Result<Batch<'_>> {
        if self.dispatching {
            return Err(Error::new(ErrorKind::ReentrantMutation));
        }
        Ok(Batch::new(self))
    }

    /// Adds one record.
    ///
    /// # Errors
    ///
    /// Returns a duplicate id error if the id is taken, or an unknown type
    /// error if the record's type is not allowed in this collection.
    pub fn add(&mut self, record: Record) -> Result<()> {
        self.add_many([record])
    }

    /// Adds several records atomically.
    ///
    /// # Errors
    ///
    /// Fails as [`Collection::add`] does, including for ids repeated
    /// within `records`; on failure nothing is added.
    pub fn add_many(&mut self, records: impl IntoIterator<Item = Record>) -> Result<()> {
        let mut batch = self.batch()?;
        for record in records {
            batch.add(record)?;
        }
        batch.commit();
        Ok(())
    }

    /// Removes and returns a record.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no record has the id.
    pub fn remove(&mut self, id: &RecordId) -> Result<Record> {
        let mut batch = self.batch()?;
        let removed = batch.remove(id)?;
        batch.commit();
        Ok(removed)
    }

    /// Validates and writes one attribute, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns not-found, schema mismatch, or validation errors; on
    /// failure the record is unchanged.
    pub fn set_attribute(
        &mut self,
        id: &RecordId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Value> {
        let mut batch = self.batch()?;
        let old = batch.set(id, name, value)?;
        batch.commit();
        Ok(old)
    }

    /// Registers an observer of records added and removed.
    pub fn observe_structure<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StructuralChange) + 'static,
    {
        self.bus.subscribe_structure(callback)
    }

    /// Registers an observer of attribute changes.
    pub fn observe_attributes<F>(&mut self, filter: AttributeFilter, callback: F) -> SubscriptionId
    where
        F: FnMut(&AttributeChange) + 'static,
    {
        self.bus.subscribe_attributes(filter, callback)
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unobserve(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Checks that a record's schema is allowed by the configured base type.
    pub(crate) fn check_allowed(&self, schema: &ShapeSchema) -> Result<()> {
        let Some(base) = &self.config.base_type else {
            return Ok(());
        };
        let base_tag = self
            .registry
            .get(base)
            .map_or(base.as_str(), |s| s.type_tag.as_str());
        if schema.is_a(base_tag) {
            Ok(())
        } else {
            Err(Error::unknown_type(
                schema.type_tag.as_str(),
                format!("not a {base_tag}"),
            ))
        }
    }

    /// Installs a committed state and notifies observers.
    pub(crate) fn apply(
        &mut self,
        state: State,
        structural: &StructuralChange,
        changes: &[AttributeChange],
    ) {
        self.state = state;
        let _dispatch = DispatchGuard::enter(&mut self.dispatching);
        if !structural.is_empty() {
            self.bus.emit_structure(structural);
        }
        for change in changes {
            trace!(id = %change.id, attribute = %change.attribute, "attribute changed");
            self.bus.emit_attribute(change);
        }
    }

    pub(crate) fn skips_unchanged_writes(&self) -> bool {
        self.config.skip_unchanged_writes
    }

    /// Applies `f` inside a batch and commits only if it succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first error from `f`; nothing is applied in that case.
    pub fn transaction<F>(&mut self, f: F) -> Result<ChangeSummary>
    where
        F: FnOnce(&mut Batch<'_>) -> Result<()>,
    {
        let mut batch = self.batch()?;
        f(&mut batch)?;
        Ok(batch.commit())
    }
}

/// Holds the dispatching flag for the duration of a notification pass.
///
/// Clears the flag on drop, including when an observer panics.
struct DispatchGuard<'a>(&'a mut bool);

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("records", &self.iter().collect::<Vec<_>>())
            .field("config", &self.config)
            .field("observers", &self.bus)
            .finish_non_exhaustive()
    }
}
