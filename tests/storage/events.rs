//! Integration tests for change events
//!
//! Tests structural and attribute notifications, filters, and delivery order.

use std::cell::RefCell;
use std::rc::Rc;

use scenetable_foundation::{RecordId, Value};
use scenetable_storage::{
    AttributeChange, AttributeFilter, Collection, CollectionConfig, Record, ShapeKind,
    StructuralChange,
};

fn log<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(&T) + 'static) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    (events, move |event: &T| sink.borrow_mut().push(event.clone()))
}

#[test]
fn one_structural_event_per_commit() {
    let mut collection = Collection::new();
    let (events, callback) = log::<StructuralChange>();
    collection.observe_structure(callback);

    collection
        .add_many([Record::of(ShapeKind::Sphere, 1), Record::of(ShapeKind::Sphere, 2)])
        .unwrap();
    collection.remove(&RecordId::from(1)).unwrap();

    let events = events.borrow();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].added.len(), 2);
    assert!(events[0].removed.is_empty());
    assert_eq!(events[1].removed[0].id(), &RecordId::from(1));
}

#[test]
fn attribute_events_carry_old_and_new() {
    let mut collection = Collection::new();
    collection.add(Record::of(ShapeKind::Sphere, 1)).unwrap();
    let (events, callback) = log::<AttributeChange>();
    collection.observe_attributes(AttributeFilter::attribute("radius"), callback);

    collection.set_attribute(&RecordId::from(1), "radius", 2.0).unwrap();
    collection.set_attribute(&RecordId::from(1), "x", 2.0).unwrap();

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].old, Value::Float(1.0));
    assert_eq!(events[0].new, Value::Float(2.0));
}

#[test]
fn new_records_do_not_emit_attribute_events() {
    let mut collection = Collection::new();
    let (events, callback) = log::<AttributeChange>();
    collection.observe_attributes(AttributeFilter::any(), callback);

    collection
        .transaction(|batch| {
            batch.add(Record::of(ShapeKind::Sphere, 1))?;
            batch.set(&RecordId::from(1), "radius", 5.0)?;
            Ok(())
        })
        .unwrap();

    assert!(events.borrow().is_empty());
}

#[test]
fn record_filter() {
    let mut collection = Collection::new();
    collection
        .add_many([Record::of(ShapeKind::Sphere, 1), Record::of(ShapeKind::Sphere, 2)])
        .unwrap();
    let (events, callback) = log::<AttributeChange>();
    collection.observe_attributes(AttributeFilter::any().for_record(2), callback);

    collection.set_attribute(&RecordId::from(1), "x", 1.0).unwrap();
    collection.set_attribute(&RecordId::from(2), "x", 1.0).unwrap();

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, RecordId::from(2));
}

#[test]
fn observers_run_in_registration_order() {
    let mut collection = Collection::new();
    collection.add(Record::of(ShapeKind::Sphere, 1)).unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));

    for (name, filter) in [
        ("any", AttributeFilter::any()),
        ("radius", AttributeFilter::attribute("radius")),
        ("any-again", AttributeFilter::any()),
    ] {
        let order = Rc::clone(&order);
        collection.observe_attributes(filter, move |_| order.borrow_mut().push(name));
    }
    collection.set_attribute(&RecordId::from(1), "radius", 2.0).unwrap();

    assert_eq!(*order.borrow(), vec!["any", "radius", "any-again"]);
}

#[test]
fn unobserve_stops_delivery() {
    let mut collection = Collection::new();
    let (events, callback) = log::<StructuralChange>();
    let subscription = collection.observe_structure(callback);
    assert!(collection.unobserve(subscription));
    assert!(!collection.unobserve(subscription));

    collection.add(Record::of(ShapeKind::Sphere, 1)).unwrap();
    assert!(events.borrow().is_empty());
}

#[test]
fn unchanged_writes_can_be_skipped() {
    let mut collection =
        Collection::with_config(CollectionConfig::new().with_skip_unchanged_writes(true));
    collection.add(Record::of(ShapeKind::Sphere, 1)).unwrap();
    let (events, callback) = log::<AttributeChange>();
    collection.observe_attributes(AttributeFilter::any(), callback);

    collection.set_attribute(&RecordId::from(1), "radius", 1.0).unwrap();
    collection.set_attribute(&RecordId::from(1), "radius", 1.5).unwrap();

    assert_eq!(events.borrow().len(), 1);
}
