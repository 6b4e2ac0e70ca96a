//! Change events and the subscriber registry.
//!
//! Observers register for structural changes (records added or removed)
//! or attribute changes, optionally filtered by attribute name and record
//! id. Callbacks receive shared references only and run synchronously in
//! registration order once a batch commits.

use std::collections::HashMap;
use std::fmt;

use scenetable_foundation::{RecordId, Value};

use crate::record::Record;

/// Records added to and removed from a collection by one commit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructuralChange {
    /// Added records in their final state, in insertion order.
    pub added: Vec<Record>,
    /// Removed records as they were before the commit.
    pub removed: Vec<Record>,
}

impl StructuralChange {
    /// Returns true if nothing was added or removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// One attribute of one record changed.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeChange {
    /// The record.
    pub id: RecordId,
    /// The attribute name.
    pub attribute: String,
    /// Value before the commit.
    pub old: Value,
    /// Value after the commit.
    pub new: Value,
}

/// Selects which attribute changes an observer receives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeFilter {
    attribute: Option<String>,
    record: Option<RecordId>,
}

impl AttributeFilter {
    /// Every attribute of every record.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Only changes to attribute `name`.
    #[must_use]
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            attribute: Some(name.into()),
            record: None,
        }
    }

    /// Narrows the filter to a single record.
    #[must_use]
    pub fn for_record(mut self, id: impl Into<RecordId>) -> Self {
        self.record = Some(id.into());
        self
    }

    /// Returns true if `change` passes this filter.
    #[must_use]
    pub fn matches(&self, change: &AttributeChange) -> bool {
        self.attribute.as_ref().is_none_or(|a| *a == change.attribute)
            && self.record.as_ref().is_none_or(|r| *r == change.id)
    }
}

/// Handle returned by subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type StructureCallback = Box<dyn FnMut(&StructuralChange)>;
type AttributeCallback = Box<dyn FnMut(&AttributeChange)>;

struct AttributeSubscriber {
    id: SubscriptionId,
    record: Option<RecordId>,
    callback: AttributeCallback,
}

impl AttributeSubscriber {
    fn notify(&mut self, change: &AttributeChange) {
        if self.record.as_ref().is_none_or(|r| *r == change.id) {
            (self.callback)(change);
        }
    }
}

/// Registry of change observers.
///
/// Attribute subscribers are indexed by attribute name, with a separate
/// wildcard list for subscribers that want every attribute.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    structure: Vec<(SubscriptionId, StructureCallback)>,
    by_attribute: HashMap<String, Vec<AttributeSubscriber>>,
    wildcard: Vec<AttributeSubscriber>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    /// Subscribes to structural changes.
    pub fn subscribe_structure<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StructuralChange) + 'static,
    {
        let id = self.next_id();
        self.structure.push((id, Box::new(callback)));
        id
    }

    /// Subscribes to attribute changes passing `filter`.
    pub fn subscribe_attributes<F>(&mut self, filter: AttributeFilter, callback: F) -> SubscriptionId
    where
        F: FnMut(&AttributeChange) + 'static,
    {
        let id = self.next_id();
        let subscriber = AttributeSubscriber {
            id,
            record: filter.record,
            callback: Box::new(callback),
        };
        match filter.attribute {
            Some(name) => self.by_attribute.entry(name).or_default().push(subscriber),
            None => self.wildcard.push(subscriber),
        }
        id
    }

    /// Removes a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.len();
        self.structure.retain(|(sub, _)| *sub != id);
        self.wildcard.retain(|s| s.id != id);
        for subscribers in self.by_attribute.values_mut() {
            subscribers.retain(|s| s.id != id);
        }
        self.by_attribute.retain(|_, subscribers| !subscribers.is_empty());
        self.len() < before
    }

    /// Number of active subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.structure.len()
            + self.wildcard.len()
            + self.by_attribute.values().map(Vec::len).sum::<usize>()
    }

    /// Returns true if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers a structural change to every structure subscriber.
    pub fn emit_structure(&mut self, change: &StructuralChange) {
        for (_, callback) in &mut self.structure {
            callback(change);
        }
    }

    /// Delivers an attribute change to matching subscribers in
    /// registration order.
    pub fn emit_attribute(&mut self, change: &AttributeChange) {
        let mut named = self
            .by_attribute
            .get_mut(&change.attribute)
            .into_iter()
            .flat_map(|subscribers| subscribers.iter_mut())
            .peekable();
        let mut wildcard = self.wildcard.iter_mut().peekable();

        loop {
            let take_named = match (named.peek(), wildcard.peek()) {
                (Some(n), Some(w)) => n.id < w.id,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_named {
                named.next()
            } else {
                wildcard.next()
            };
            if let Some(subscriber) = next {
                subscriber.notify(change);
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("structure", &self.structure.len())
            .field("attribute", &(self.len() - self.structure.len()))
            .finish()
    }
}
