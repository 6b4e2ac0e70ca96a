//! Batches: staged, all-or-nothing mutation with held notifications.
//!
//! A batch clones the collection state (O(1), persistent) and stages every
//! operation on the clone. Each operation is validated as it is staged and
//! leaves the staged state untouched if it fails. Committing swaps the
//! staged state in and dispatches one structural event followed by one
//! attribute event per changed (record, attribute) pair. Dropping the batch
//! without committing discards everything.
//!
//! Removals mark ids instead of searching the order, and the order is
//! compacted once at commit, so staging n operations stays O(n log n).

use std::collections::HashSet;
use std::sync::Arc;

use scenetable_foundation::{Error, RecordId, Result, Value};
use tracing::{debug, trace};

use crate::collection::{Collection, State};
use crate::event::{AttributeChange, StructuralChange};
use crate::record::Record;
use crate::registry::SchemaRegistry;

/// What a committed batch changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Ids of records added, in insertion order.
    pub added: Vec<RecordId>,
    /// Ids of records removed.
    pub removed: Vec<RecordId>,
    /// Number of attribute change events dispatched.
    pub changed: usize,
}

impl ChangeSummary {
    /// Returns true if the commit changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed == 0
    }
}

/// A pending set of changes to a [`Collection`].
///
/// Created by [`Collection::batch`].
#[must_use = "a batch does nothing unless committed"]
pub struct Batch<'a> {
    collection: &'a mut Collection,
    working: State,
    /// Ids added in this batch, in insertion order. May hold ids that were
    /// later removed again; `live` is authoritative.
    added: Vec<RecordId>,
    live: HashSet<RecordId>,
    removed: Vec<Record>,
    /// Ids removed from the staged index but still in the staged order.
    stale: HashSet<RecordId>,
    writes: Vec<(RecordId, String)>,
    written: HashSet<(RecordId, String)>,
    committed: bool,
}

impl<'a> Batch<'a> {
    pub(crate) fn new(collection: &'a mut Collection) -> Self {
        let working = collection.state.clone();
        Self {
            collection,
            working,
            added: Vec::new(),
            live: HashSet::new(),
            removed: Vec::new(),
            stale: HashSet::new(),
            writes: Vec::new(),
            written: HashSet::new(),
            committed: false,
        }
    }

    /// The registry of the underlying collection.
    #[must_use]
    pub fn registry(&self) -> Arc<SchemaRegistry> {
        Arc::clone(self.collection.registry())
    }

    /// Looks up a record in the staged state.
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.working.get(id)
    }

    /// Returns true if the staged state has a record with this id.
    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.working.contains(id)
    }

    /// Ids in the staged state, in order.
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.working.order.iter().filter(|id| !self.stale.contains(*id))
    }

    /// Returns true if nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.removed.is_empty() && self.writes.is_empty()
    }

    /// Stages adding a record at the end of the collection.
    ///
    /// # Errors
    ///
    /// Returns a duplicate id error if the id is present in the staged
    /// state, or an unknown type error if the record's type is not allowed.
    pub fn add(&mut self, record: Record) -> Result<()> {
        let id = record.id().clone();
        self.collection
            .check_allowed(record.schema())
            .map_err(|e| e.with_record(&id))?;
        if self.working.contains(&id) {
            return Err(Error::duplicate_id(id));
        }

        trace!(%id, type_tag = record.type_tag(), "staged add");
        if self.stale.contains(&id) {
            // Re-adding an id removed in this batch moves it to the end.
            self.compact();
            self.added.retain(|added| added != &id);
        }
        self.working.order = self.working.order.push_back(id.clone());
        self.working.index = self.working.index.insert(id.clone(), record);
        self.live.insert(id.clone());
        self.added.push(id);
        Ok(())
    }

    /// Stages removing a record, returning it as staged.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the id is absent from the staged state.
    pub fn remove(&mut self, id: &RecordId) -> Result<Record> {
        let record = self
            .working
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(id.clone()))?;
        self.working.index = self.working.index.remove(id);
        self.stale.insert(id.clone());

        trace!(%id, "staged remove");
        let added_here = self.live.remove(id);
        if let Some(original) = self.collection.state.get(id).filter(|_| !added_here) {
            self.removed.push(original.clone());
        }
        Ok(record)
    }

    /// Drops stale ids from the staged order.
    fn compact(&mut self) {
        if self.stale.is_empty() {
            return;
        }
        let stale = std::mem::take(&mut self.stale);
        self.working.order = self
            .working
            .order
            .iter()
            .filter(|id| !stale.contains(*id))
            .cloned()
            .collect();
    }

    /// Stages a validated attribute write, returning the staged previous
    /// value.
    ///
    /// # Errors
    ///
    /// Returns not-found, schema mismatch, or validation errors.
    pub fn set(&mut self, id: &RecordId, name: &str, value: impl Into<Value>) -> Result<Value> {
        let mut record = self
            .working
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(id.clone()))?;
        let value = value.into();
        trace!(%id, attribute = name, %value, "staged write");
        let old = record.set(name, value)?;

        self.working.index = self.working.index.insert(id.clone(), record);
        let key = (id.clone(), name.to_string());
        if self.written.insert(key.clone()) {
            self.writes.push(key);
        }
        Ok(old)
    }

    /// Applies the staged state and notifies observers.
    pub fn commit(mut self) -> ChangeSummary {
        self.committed = true;
        self.compact();
        let state = std::mem::take(&mut self.working);
        let original = &self.collection.state;
        let skip_unchanged = self.collection.skips_unchanged_writes();
        let live = std::mem::take(&mut self.live);
        let added: Vec<RecordId> = std::mem::take(&mut self.added)
            .into_iter()
            .filter(|id| live.contains(id))
            .collect();

        let structural = StructuralChange {
            added: added.iter().filter_map(|id| state.get(id).cloned()).collect(),
            removed: std::mem::take(&mut self.removed),
        };

        let mut changes = Vec::new();
        for (id, attribute) in &self.writes {
            if live.contains(id) {
                continue;
            }
            let (Some(before), Some(after)) = (original.get(id), state.get(id)) else {
                continue;
            };
            let (Ok(old), Ok(new)) = (before.get(attribute), after.get(attribute)) else {
                continue;
            };
            if skip_unchanged && old == new {
                continue;
            }
            changes.push(AttributeChange {
                id: id.clone(),
                attribute: attribute.clone(),
                old: old.clone(),
                new: new.clone(),
            });
        }

        let summary = ChangeSummary {
            added,
            removed: structural.removed.iter().map(|r| r.id().clone()).collect(),
            changed: changes.len(),
        };
        debug!(
            added = summary.added.len(),
            removed = summary.removed.len(),
            changed = summary.changed,
            "batch committed"
        );

        self.collection.apply(state, &structural, &changes);
        summary
    }

    /// Discards every staged change.
    pub fn rollback(self) {}
}

impl Drop for Batch<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.is_empty() {
            debug!(
                added = self.live.len(),
                removed = self.removed.len(),
                writes = self.writes.len(),
                "batch rolled back"
            );
        }
    }
}
