//! Property tests for reconcile
//!
//! Generated tables of sphere rows check idempotence, id uniqueness, and
//! that removal leaves exactly the table's ids.

use std::collections::HashSet;

use proptest::prelude::*;
use scenetable_foundation::{RecordId, Row, Table, Value};
use scenetable_storage::{Collection, ExportOptions, ReconcileOptions};

fn sphere_row() -> impl Strategy<Value = Row> {
    (
        0i64..40,
        proptest::option::of(-100.0f64..100.0),
        proptest::option::of(0.0f64..10.0),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(id, x, radius, visible)| {
            let mut row = Row::new().with("id", id);
            if let Some(x) = x {
                row.insert("x", x);
            }
            if let Some(radius) = radius {
                row.insert("radius", radius);
            }
            if let Some(visible) = visible {
                row.insert("visible", visible);
            }
            row
        })
}

/// Rows with distinct ids.
fn sphere_table() -> impl Strategy<Value = Table> {
    proptest::collection::vec(sphere_row(), 0..25).prop_map(|rows| {
        let mut seen = HashSet::new();
        Table::from_rows(
            rows.into_iter()
                .filter(|row| seen.insert(row.id().cloned().map(|v| v.to_string()))),
        )
    })
}

fn options() -> ReconcileOptions {
    ReconcileOptions::new("Sphere")
}

proptest! {
    #[test]
    fn reconcile_is_idempotent(table in sphere_table()) {
        let mut collection = Collection::new();
        collection.reconcile(&table, &options()).unwrap();
        let once = collection.export(&ExportOptions::new());

        let summary = collection.reconcile(&table, &options()).unwrap();
        prop_assert!(summary.added.is_empty());
        prop_assert!(summary.removed.is_empty());
        prop_assert_eq!(collection.export(&ExportOptions::new()), once);
    }

    #[test]
    fn ids_stay_unique(first in sphere_table(), second in sphere_table()) {
        let mut collection = Collection::new();
        collection.reconcile(&first, &options()).unwrap();
        collection.reconcile(&second, &options()).unwrap();

        let ids: Vec<&RecordId> = collection.ids().collect();
        let unique: HashSet<&RecordId> = ids.iter().copied().collect();
        prop_assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn removal_leaves_exactly_table_ids(first in sphere_table(), second in sphere_table()) {
        let mut collection = Collection::new();
        collection.reconcile(&first, &options()).unwrap();
        collection.reconcile(&second, &options().remove_missing(true)).unwrap();

        let expected: HashSet<Value> = second
            .rows()
            .iter()
            .filter_map(|row| row.id().cloned())
            .collect();
        let actual: HashSet<Value> = collection.ids().map(|id| id.value().clone()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn written_cells_are_read_back(table in sphere_table()) {
        let mut collection = Collection::new();
        collection.reconcile(&table, &options()).unwrap();

        for row in table.rows() {
            let id = RecordId::new(row.id().cloned().unwrap()).unwrap();
            let record = collection.get(&id).unwrap();
            for (column, value) in row.iter().filter(|(c, _)| *c != "id") {
                prop_assert_eq!(record.get(column).unwrap(), value);
            }
        }
    }
}
