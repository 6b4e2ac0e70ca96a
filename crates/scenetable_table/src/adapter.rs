//! Moving records between collections and tables.

use scenetable_foundation::{Result, Table};
use scenetable_storage::{ChangeSummary, Collection, ExportOptions, ReconcileOptions};

use crate::normalize::{NormalizeOptions, normalize};

/// Exports a collection as a table, one row per record.
///
/// Vector and color attributes come out as fixed-length tuples and list
/// attributes as persistent lists, so the table never aliases record state.
#[must_use]
pub fn to_table(collection: &Collection, options: &ExportOptions) -> Table {
    collection.export(options)
}

/// Normalizes `table` and reconciles `collection` against it.
///
/// # Errors
///
/// Returns normalization errors (rows without an id) and every error
/// [`Collection::reconcile`] reports. Nothing is applied on error.
pub fn apply_table(
    collection: &mut Collection,
    table: &Table,
    normalize_options: &NormalizeOptions,
    options: &ReconcileOptions,
) -> Result<ChangeSummary> {
    let table = normalize(table.clone(), normalize_options)?;
    collection.reconcile(&table, options)
}
