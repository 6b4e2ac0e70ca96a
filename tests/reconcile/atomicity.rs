//! Failed reconciles change nothing
//!
//! Every failure mode is checked against a snapshot of the collection and
//! against an observer that must stay silent.

use std::cell::Cell;
use std::rc::Rc;

use scenetable_foundation::{ErrorKind, RecordId, Row, Table};
use scenetable_storage::{
    AttributeFilter, Collection, CollectionConfig, ExportOptions, Record, ReconcileOptions,
    ShapeKind,
};

fn watched() -> (Collection, Rc<Cell<usize>>) {
    let mut collection = Collection::new();
    collection
        .add_many([Record::of(ShapeKind::Sphere, 1), Record::of(ShapeKind::Sphere, 2)])
        .unwrap();
    let calls = Rc::new(Cell::new(0));
    let structure = Rc::clone(&calls);
    collection.observe_structure(move |_| structure.set(structure.get() + 1));
    let attributes = Rc::clone(&calls);
    collection.observe_attributes(AttributeFilter::any(), move |_| {
        attributes.set(attributes.get() + 1);
    });
    (collection, calls)
}

fn assert_untouched(collection: &Collection, before: &Table, calls: &Cell<usize>) {
    assert_eq!(&collection.export(&ExportOptions::new()), before);
    assert_eq!(calls.get(), 0);
}

#[test]
fn unknown_column_is_schema_mismatch() {
    let (mut collection, calls) = watched();
    let before = collection.export(&ExportOptions::new());
    let table = Table::from_rows([
        Row::new().with("id", 1).with("radius", 3.0),
        Row::new().with("id", 3).with("wobble", 1.0),
    ]);

    let err = collection
        .reconcile(&table, &ReconcileOptions::new("Sphere"))
        .unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::SchemaMismatch { id: Some(ref id), ref attribute, .. }
            if *id == RecordId::from(3) && attribute == "wobble"
    ));
    assert_untouched(&collection, &before, &calls);
}

#[test]
fn duplicate_new_ids() {
    let (mut collection, calls) = watched();
    let before = collection.export(&ExportOptions::new());
    let table = Table::from_rows([
        Row::new().with("id", 7).with("x", 1.0),
        Row::new().with("id", 7).with("x", 2.0),
    ]);

    let err = collection
        .reconcile(&table, &ReconcileOptions::new("Sphere"))
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::DuplicateId { .. }));
    assert_untouched(&collection, &before, &calls);
}

#[test]
fn int_and_integral_float_ids_collide() {
    let (mut collection, calls) = watched();
    let before = collection.export(&ExportOptions::new());
    let table = Table::from_rows([
        Row::new().with("id", 9).with("x", 1.0),
        Row::new().with("id", 9.0).with("x", 2.0),
    ]);

    let err = collection
        .reconcile(&table, &ReconcileOptions::new("Sphere"))
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::DuplicateId { .. }));
    assert_eq!(err.context.as_ref().and_then(|c| c.row), Some(1));
    assert_untouched(&collection, &before, &calls);
}

#[test]
fn invalid_value_after_valid_rows() {
    let (mut collection, calls) = watched();
    let before = collection.export(&ExportOptions::new());
    let table = Table::from_rows([
        Row::new().with("id", 1).with("radius", 2.0),
        Row::new().with("id", 4),
        Row::new().with("id", 2).with("transparency", 3.0),
    ]);

    let err = collection
        .reconcile(&table, &ReconcileOptions::new("Sphere").remove_missing(true))
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Validation { .. }));
    assert_eq!(err.context.as_ref().and_then(|c| c.row), Some(2));
    assert_untouched(&collection, &before, &calls);
}

#[test]
fn missing_id_column() {
    let (mut collection, calls) = watched();
    let before = collection.export(&ExportOptions::new());
    let table = Table::from_rows([Row::new().with("x", 1.0)]);

    let err = collection
        .reconcile(&table, &ReconcileOptions::new("Sphere"))
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::MissingColumn { ref column, row: None } if column == "id"));
    assert_untouched(&collection, &before, &calls);
}

#[test]
fn requested_column_absent() {
    let (mut collection, calls) = watched();
    let before = collection.export(&ExportOptions::new());
    let table = Table::from_rows([Row::new().with("id", 1).with("x", 1.0)]);

    let err = collection
        .reconcile(&table, &ReconcileOptions::new("Sphere").with_columns(["x", "y"]))
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::MissingColumn { ref column, .. } if column == "y"));
    assert_untouched(&collection, &before, &calls);
}

#[test]
fn disallowed_type_for_base() {
    let mut collection =
        Collection::with_config(CollectionConfig::new().with_base_type("Sphere"));
    let table = Table::from_rows([Row::new().with("id", 1)]);

    let err = collection
        .reconcile(&table, &ReconcileOptions::new("WireBox"))
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::UnknownType { id: Some(_), .. }));
    assert!(collection.is_empty());
}
