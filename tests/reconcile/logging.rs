//! Log output of reconcile and batches

use scenetable_foundation::{Row, Table};
use scenetable_storage::{Collection, ReconcileOptions};
use tracing_test::traced_test;

#[test]
#[traced_test]
fn applied_reconcile_is_logged() {
    let mut collection = Collection::new();
    let table = Table::from_rows([Row::new().with("id", 1).with("radius", 2.0)]);
    collection.reconcile(&table, &ReconcileOptions::new("Sphere")).unwrap();

    assert!(logs_contain("batch committed"));
    assert!(logs_contain("reconcile applied"));
}

#[test]
#[traced_test]
fn aborted_reconcile_is_logged() {
    let mut collection = Collection::new();
    let table = Table::from_rows([Row::new().with("id", 1).with("radius", -2.0)]);
    assert!(collection.reconcile(&table, &ReconcileOptions::new("Sphere")).is_err());

    assert!(logs_contain("reconcile aborted"));
    assert!(!logs_contain("batch committed"));
}
