//! Integration tests for rows and tables
//!
//! Tests column order, gap filling, and column selection.

use scenetable_foundation::{Row, Table, Value};

fn sample() -> Table {
    Table::from_rows([
        Row::new().with("id", 1).with("x", 0.5),
        Row::new().with("id", 2).with("radius", 2.0),
    ])
}

#[test]
fn columns_in_first_seen_order() {
    assert_eq!(sample().columns(), ["id", "x", "radius"]);
}

#[test]
fn absent_cells_read_as_nil() {
    let table = sample();
    assert_eq!(
        table.column_values("radius"),
        Some(vec![Value::Nil, Value::Float(2.0)])
    );
    assert_eq!(table.column_values("missing"), None);
}

#[test]
fn select_keeps_requested_columns() {
    let table = sample().select(&["id", "radius"]);
    assert_eq!(table.columns(), ["id", "radius"]);
    assert!(!table.rows()[0].contains("x"));
}

#[test]
fn drop_column_removes_cells() {
    let mut table = sample();
    table.drop_column("x");
    assert!(!table.has_column("x"));
    assert!(table.rows().iter().all(|row| !row.contains("x")));
}

#[test]
fn row_insert_keeps_position() {
    let mut row = Row::new().with("id", 1).with("x", 0.0).with("y", 0.0);
    assert_eq!(row.insert("x", 3.0), Some(Value::Float(0.0)));
    assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "x", "y"]);
}
