//! Column frames feed reconcile like row tables do

use scenetable_foundation::{RecordId, Value};
use scenetable_storage::{Collection, ExportOptions, Record, ReconcileOptions, ShapeKind};
use scenetable_table::{ColumnFrame, NormalizeOptions, apply_table, to_table};

#[test]
fn frame_from_json_reconciles() {
    let frame: ColumnFrame =
        serde_json::from_str(r#"{"id":[1,2],"x":[0.5,null],"radius":[2,3]}"#).unwrap();
    let table = frame.to_table().unwrap();

    let mut collection = Collection::new();
    apply_table(
        &mut collection,
        &table,
        &NormalizeOptions::new(),
        &ReconcileOptions::new("Sphere"),
    )
    .unwrap();

    let second = collection.get(&RecordId::from(2)).unwrap();
    assert_eq!(second.get("x").unwrap(), &Value::Float(0.0));
    assert_eq!(second.get("radius").unwrap(), &Value::Float(3.0));
}

#[test]
fn frame_of_an_export() {
    let mut collection = Collection::new();
    collection
        .add_many([Record::of(ShapeKind::Sphere, 1), Record::of(ShapeKind::Line, 2)])
        .unwrap();
    let frame = ColumnFrame::from_table(&to_table(
        &collection,
        &ExportOptions::new().with_columns(["radius", "linewidth"]),
    ));

    assert_eq!(frame.height(), 2);
    assert_eq!(frame.column("radius"), Some(&[Value::Float(1.0), Value::Nil][..]));
    assert_eq!(frame.column("linewidth"), Some(&[Value::Nil, Value::Float(1.0)][..]));
}
