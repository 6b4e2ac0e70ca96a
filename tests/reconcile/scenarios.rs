//! End-to-end reconcile scenarios
//!
//! Tests the behaviors a caller relies on when syncing a table into a scene.

use scenetable_foundation::{ErrorKind, RecordId, Row, Table, Value};
use scenetable_storage::{Collection, ExportOptions, Record, ReconcileOptions, ShapeKind};

fn two_spheres() -> Collection {
    let mut collection = Collection::new();
    collection
        .add_many([Record::of(ShapeKind::Sphere, 1), Record::of(ShapeKind::Sphere, 2)])
        .unwrap();
    collection
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn remove_missing_keeps_only_table_ids() {
    let mut collection = two_spheres();
    let table = Table::from_rows([Row::new().with("id", 1).with("radius", 2.5)]);
    let options = ReconcileOptions::new("Sphere").remove_missing(true);

    let summary = collection.reconcile(&table, &options).unwrap();

    assert_eq!(summary.removed, vec![RecordId::from(2)]);
    assert_eq!(collection.len(), 1);
    let record = collection.get(&RecordId::from(1)).unwrap();
    assert_eq!(record.get("radius").unwrap(), &Value::Float(2.5));
}

#[test]
fn absent_ids_kept_by_default() {
    let mut collection = two_spheres();
    let table = Table::from_rows([Row::new().with("id", 1).with("radius", 2.5)]);
    collection.reconcile(&table, &ReconcileOptions::new("Sphere")).unwrap();
    assert_eq!(collection.len(), 2);
}

#[test]
fn empty_table_with_removal_clears() {
    let mut collection = two_spheres();
    let table = Table::new(["id"]);
    let summary = collection
        .reconcile(&table, &ReconcileOptions::new("Sphere").remove_missing(true))
        .unwrap();

    assert_eq!(summary.removed.len(), 2);
    assert!(collection.is_empty());
}

#[test]
fn table_with_no_rows_or_columns_clears_with_removal() {
    let mut collection = two_spheres();
    let options = ReconcileOptions::new("Sphere")
        .with_type_column("shape_type")
        .remove_missing(true);

    let summary = collection.reconcile(&Table::from_rows(Vec::<Row>::new()), &options).unwrap();

    assert_eq!(summary.removed, vec![RecordId::from(1), RecordId::from(2)]);
    assert!(collection.is_empty());
}

#[test]
fn exported_empty_collection_reconciles_back() {
    let empty = Collection::new();
    let table = empty.export(&ExportOptions::default());
    assert!(table.has_column("id"));

    let mut target = two_spheres();
    let options = ReconcileOptions::new("Sphere")
        .with_type_column("shape_type")
        .remove_missing(true);
    target.reconcile(&table, &options).unwrap();

    assert!(target.is_empty());
}

#[test]
fn float_id_updates_record_with_int_id() {
    let mut collection = two_spheres();
    let table = Table::from_rows([Row::new().with("id", 2.0).with("radius", 4.0)]);
    let options = ReconcileOptions::new("Sphere").remove_missing(true);

    let summary = collection.reconcile(&table, &options).unwrap();

    assert!(summary.added.is_empty());
    assert_eq!(summary.removed, vec![RecordId::from(1)]);
    assert_eq!(
        collection.get(&RecordId::from(2)).unwrap().get("radius").unwrap(),
        &Value::Float(4.0)
    );
}

// =============================================================================
// Creation and types
// =============================================================================

#[test]
fn type_column_picks_shapes() {
    let mut collection = Collection::new();
    let table = Table::from_rows([
        Row::new().with("id", "ball").with("shape_type", "Sphere"),
        Row::new()
            .with("id", "crate")
            .with("shape_type", ShapeKind::WireBox.type_tag())
            .with("a", vec![2.0, 0.0, 0.0]),
    ]);
    let options = ReconcileOptions::new("Sphere").with_type_column("shape_type");
    collection.reconcile(&table, &options).unwrap();

    let crate_box = collection.get(&RecordId::from("crate")).unwrap();
    assert_eq!(crate_box.type_tag(), ShapeKind::WireBox.type_tag());
    assert_eq!(crate_box.get("a").unwrap(), &Value::Vec3([2.0, 0.0, 0.0]));
    assert_eq!(
        collection.get(&RecordId::from("ball")).unwrap().type_tag(),
        ShapeKind::Sphere.type_tag()
    );
}

#[test]
fn unknown_type_fails() {
    let mut collection = Collection::new();
    let table = Table::from_rows([Row::new().with("id", 1)]);
    let err = collection
        .reconcile(&table, &ReconcileOptions::new("Teapot"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownType { .. }));
}

#[test]
fn new_records_append_in_row_order() {
    let mut collection = two_spheres();
    let table = Table::from_rows([
        Row::new().with("id", 9),
        Row::new().with("id", 1),
        Row::new().with("id", 5),
    ]);
    collection.reconcile(&table, &ReconcileOptions::new("Sphere")).unwrap();

    let ids: Vec<_> = collection.ids().cloned().collect();
    assert_eq!(
        ids,
        vec![RecordId::from(1), RecordId::from(2), RecordId::from(9), RecordId::from(5)]
    );
}

// =============================================================================
// Partial updates
// =============================================================================

#[test]
fn column_subset_leaves_other_attributes() {
    let mut collection = two_spheres();
    let table = Table::from_rows([Row::new().with("id", 1).with("x", 3.0).with("radius", 9.0)]);
    let options = ReconcileOptions::new("Sphere").with_columns(["x"]);
    collection.reconcile(&table, &options).unwrap();

    let record = collection.get(&RecordId::from(1)).unwrap();
    assert_eq!(record.get("x").unwrap(), &Value::Float(3.0));
    assert_eq!(record.get("radius").unwrap(), &Value::Float(1.0));
}

#[test]
fn missing_cells_leave_values() {
    let mut collection = two_spheres();
    collection.set_attribute(&RecordId::from(1), "y", 4.0).unwrap();
    let table = Table::from_rows([
        Row::new().with("id", 1).with("y", f64::NAN).with("x", 1.0),
        Row::new().with("id", 2).with("y", Value::Nil),
    ]);
    collection.reconcile(&table, &ReconcileOptions::new("Sphere")).unwrap();

    let record = collection.get(&RecordId::from(1)).unwrap();
    assert_eq!(record.get("y").unwrap(), &Value::Float(4.0));
    assert_eq!(record.get("x").unwrap(), &Value::Float(1.0));
}
