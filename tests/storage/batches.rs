//! Integration tests for batches
//!
//! Tests staged visibility, commit summaries, and rollback on drop or error.

use scenetable_foundation::{ErrorKind, RecordId, Value};
use scenetable_storage::{Collection, Record, ShapeKind};

fn spheres(n: i64) -> Collection {
    let mut collection = Collection::new();
    collection
        .add_many((1..=n).map(|i| Record::of(ShapeKind::Sphere, i)))
        .unwrap();
    collection
}

#[test]
fn staged_changes_visible_inside_batch() {
    let mut collection = spheres(1);
    let mut batch = collection.batch().unwrap();
    batch.add(Record::of(ShapeKind::Sphere, 2)).unwrap();
    batch.set(&RecordId::from(1), "radius", 4.0).unwrap();

    assert!(batch.contains(&RecordId::from(2)));
    assert_eq!(
        batch.get(&RecordId::from(1)).unwrap().get("radius").unwrap(),
        &Value::Float(4.0)
    );
    batch.rollback();
}

#[test]
fn rollback_leaves_collection_untouched() {
    let mut collection = spheres(2);
    let mut batch = collection.batch().unwrap();
    batch.remove(&RecordId::from(1)).unwrap();
    batch.set(&RecordId::from(2), "x", 9.0).unwrap();
    batch.rollback();

    assert_eq!(collection.len(), 2);
    assert_eq!(
        collection.get(&RecordId::from(2)).unwrap().get("x").unwrap(),
        &Value::Float(0.0)
    );
}

#[test]
fn dropped_batch_rolls_back() {
    let mut collection = spheres(1);
    {
        let mut batch = collection.batch().unwrap();
        batch.add(Record::of(ShapeKind::Sphere, 2)).unwrap();
    }
    assert_eq!(collection.len(), 1);
}

#[test]
fn commit_summarizes_net_changes() {
    let mut collection = spheres(2);
    let mut batch = collection.batch().unwrap();
    batch.add(Record::of(ShapeKind::Sphere, 3)).unwrap();
    batch.add(Record::of(ShapeKind::Sphere, 4)).unwrap();
    batch.remove(&RecordId::from(4)).unwrap();
    batch.remove(&RecordId::from(1)).unwrap();
    batch.set(&RecordId::from(2), "y", 1.0).unwrap();
    batch.set(&RecordId::from(2), "y", 2.0).unwrap();
    let summary = batch.commit();

    assert_eq!(summary.added, vec![RecordId::from(3)]);
    assert_eq!(summary.removed, vec![RecordId::from(1)]);
    assert_eq!(summary.changed, 1);
    let ids: Vec<_> = collection.ids().cloned().collect();
    assert_eq!(ids, vec![RecordId::from(2), RecordId::from(3)]);
}

#[test]
fn transaction_commits_on_success() {
    let mut collection = spheres(1);
    let summary = collection
        .transaction(|batch| {
            batch.set(&RecordId::from(1), "radius", 3.0)?;
            batch.add(Record::of(ShapeKind::Line, 2))
        })
        .unwrap();

    assert_eq!(summary.added, vec![RecordId::from(2)]);
    assert_eq!(collection.len(), 2);
}

#[test]
fn transaction_discards_on_error() {
    let mut collection = spheres(1);
    let err = collection
        .transaction(|batch| {
            batch.set(&RecordId::from(1), "radius", 3.0)?;
            batch.set(&RecordId::from(1), "radius", -3.0)?;
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Validation { .. }));
    assert_eq!(
        collection.get(&RecordId::from(1)).unwrap().get("radius").unwrap(),
        &Value::Float(1.0)
    );
}
