//! Collections survive export, serialization, and re-application

use proptest::prelude::*;
use scenetable_foundation::{RecordId, TYPE_COLUMN, Value};
use scenetable_storage::{Collection, ExportOptions, Record, ReconcileOptions, ShapeKind};
use scenetable_table::{
    NormalizeOptions, apply_table, from_json, from_msgpack, load_from_file, save_to_file, to_json,
    to_msgpack, to_table,
};

fn scene() -> Collection {
    let mut collection = Collection::new();
    collection
        .add_many([
            Record::of(ShapeKind::Sphere, 1)
                .with("radius", 0.5)
                .and_then(|r| r.with("color", "blue"))
                .unwrap(),
            Record::of(ShapeKind::WireBox, 2)
                .with("a", [2.0, 0.0, 0.0])
                .and_then(|r| r.with("color", [0.0, 1.0, 0.0]))
                .unwrap(),
            Record::of(ShapeKind::Line, "edge")
                .with("end", [3.0, 3.0, 0.0])
                .and_then(|r| r.with("label", "diagonal"))
                .unwrap(),
        ])
        .unwrap();
    collection
}

fn typed() -> ReconcileOptions {
    ReconcileOptions::new("Sphere").with_type_column(TYPE_COLUMN)
}

fn rebuild(table: &scenetable_foundation::Table) -> Collection {
    let mut copy = Collection::new();
    apply_table(&mut copy, table, &NormalizeOptions::new(), &typed()).unwrap();
    copy
}

#[test]
fn through_json() {
    let source = scene();
    let json = to_json(&to_table(&source, &ExportOptions::new())).unwrap();
    let copy = rebuild(&from_json(&json).unwrap());

    assert_eq!(copy.iter().collect::<Vec<_>>(), source.iter().collect::<Vec<_>>());
}

#[test]
fn through_msgpack() {
    let source = scene();
    let bytes = to_msgpack(&to_table(&source, &ExportOptions::new())).unwrap();
    let copy = rebuild(&from_msgpack(&bytes).unwrap());

    assert_eq!(copy.iter().collect::<Vec<_>>(), source.iter().collect::<Vec<_>>());
}

#[test]
fn through_a_file() {
    let source = scene();
    let path = std::env::temp_dir().join(format!("scenetable-roundtrip-{}.json", std::process::id()));
    save_to_file(&to_table(&source, &ExportOptions::new()), &path).unwrap();
    let loaded = load_from_file(&path);
    let _ = std::fs::remove_file(&path);

    let copy = rebuild(&loaded.unwrap());
    assert_eq!(copy.len(), 3);
    assert_eq!(
        copy.get(&RecordId::from("edge")).unwrap().get("end").unwrap(),
        &Value::Vec3([3.0, 3.0, 0.0])
    );
}

#[test]
fn exported_values_are_detached() {
    let mut source = scene();
    let table = to_table(&source, &ExportOptions::new().with_columns(["a"]));
    source
        .set_attribute(&RecordId::from(2), "a", [5.0, 5.0, 5.0])
        .unwrap();

    assert_eq!(table.rows()[1].get("a"), Some(&Value::Vec3([2.0, 0.0, 0.0])));
    assert_eq!(table.rows()[0].get("a"), Some(&Value::Nil));
}

proptest! {
    #[test]
    fn positions_round_trip(points in proptest::collection::vec((-1e6f64..1e6, -1e6f64..1e6, -1e6f64..1e6), 0..20)) {
        let mut source = Collection::new();
        for (i, (x, y, z)) in points.into_iter().enumerate() {
            let record = Record::of(ShapeKind::Sphere, i64::try_from(i).unwrap())
                .with("x", x)
                .and_then(|r| r.with("y", y))
                .and_then(|r| r.with("z", z))
                .unwrap();
            source.add(record).unwrap();
        }

        let bytes = to_msgpack(&to_table(&source, &ExportOptions::new())).unwrap();
        let copy = rebuild(&from_msgpack(&bytes).unwrap());
        prop_assert_eq!(
            copy.export(&ExportOptions::new()),
            source.export(&ExportOptions::new())
        );
    }
}
