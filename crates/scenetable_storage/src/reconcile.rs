//! Reconciling a collection against a table of desired record states.
//!
//! Each row names a record by id. Rows for unknown ids create records of
//! the row's type; every non-missing cell is written to its attribute.
//! The whole call is one batch: it is validated completely before any
//! observer hears about it, and any failure leaves the collection as it
//! was.

use std::collections::HashSet;

use scenetable_foundation::{
    Error, ErrorContext, ID_COLUMN, RecordId, Result, Row, Table, Value,
};
use tracing::{debug, warn};

use crate::batch::{Batch, ChangeSummary};
use crate::collection::Collection;
use crate::record::Record;

/// How a table is applied to a collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Type tag for new records when there is no type column.
    pub default_type: String,
    /// Only these columns are written; `None` writes every column.
    pub columns: Option<Vec<String>>,
    /// Column holding each new record's type tag.
    pub type_column: Option<String>,
    /// Remove records whose ids do not appear in the table.
    pub remove_missing: bool,
}

impl ReconcileOptions {
    /// Creates options creating new records as `default_type`.
    #[must_use]
    pub fn new(default_type: impl Into<String>) -> Self {
        Self {
            default_type: default_type.into(),
            columns: None,
            type_column: None,
            remove_missing: false,
        }
    }

    /// Restricts writes to the given columns.
    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Reads new records' type tags from `column`.
    #[must_use]
    pub fn with_type_column(mut self, column: impl Into<String>) -> Self {
        self.type_column = Some(column.into());
        self
    }

    /// Sets whether records absent from the table are removed.
    #[must_use]
    pub fn remove_missing(mut self, remove: bool) -> Self {
        self.remove_missing = remove;
        self
    }

    fn writes_column(&self, column: &str) -> bool {
        column != ID_COLUMN
            && self.type_column.as_deref() != Some(column)
            && self
                .columns
                .as_ref()
                .is_none_or(|columns| columns.iter().any(|c| c == column))
    }
}

impl Collection {
    /// Brings the collection in line with `table`.
    ///
    /// Existing records keep their position; new records are appended in
    /// row order. Missing cells (nil or NaN) leave attributes untouched.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if a row lacks an id, ids are
    /// invalid or repeated, a requested column or the type column is absent,
    /// a new row's type is unknown or not allowed, a column is not an
    /// attribute of its record, or a value fails validation.
    pub fn reconcile(&mut self, table: &Table, options: &ReconcileOptions) -> Result<ChangeSummary> {
        match self.try_reconcile(table, options) {
            Ok(summary) => {
                debug!(
                    rows = table.len(),
                    added = summary.added.len(),
                    removed = summary.removed.len(),
                    changed = summary.changed,
                    "reconcile applied"
                );
                Ok(summary)
            }
            Err(error) => {
                warn!(%error, rows = table.len(), "reconcile aborted");
                Err(error)
            }
        }
    }

    fn try_reconcile(&mut self, table: &Table, options: &ReconcileOptions) -> Result<ChangeSummary> {
        let ids = check_table(table, options)?;
        let mut batch = self.batch()?;

        for (index, (row, id)) in table.rows().iter().zip(&ids).enumerate() {
            stage_row(&mut batch, row, id, options).map_err(|e| {
                e.with_record(id).with_context(
                    ErrorContext::new()
                        .with_operation("reconcile")
                        .with_row(index),
                )
            })?;
        }

        if options.remove_missing {
            let keep: HashSet<&RecordId> = ids.iter().collect();
            let stale: Vec<RecordId> = batch.ids().filter(|id| !keep.contains(id)).cloned().collect();
            for id in &stale {
                batch.remove(id)?;
            }
        }

        Ok(batch.commit())
    }
}

/// Checks table-wide preconditions and returns the row ids in order.
fn check_table(table: &Table, options: &ReconcileOptions) -> Result<Vec<RecordId>> {
    let context = || ErrorContext::new().with_operation("reconcile");

    // A table without rows writes nothing, so its header is not checked.
    if table.is_empty() {
        return Ok(Vec::new());
    }
    if !table.has_column(ID_COLUMN) {
        return Err(Error::missing_column(ID_COLUMN, None).with_context(context()));
    }
    let required = options.type_column.iter().chain(options.columns.iter().flatten());
    for column in required {
        if !table.has_column(column) {
            return Err(Error::missing_column(column.as_str(), None).with_context(context()));
        }
    }

    let mut seen = HashSet::with_capacity(table.len());
    let mut ids = Vec::with_capacity(table.len());
    for (index, row) in table.rows().iter().enumerate() {
        let at_row = || context().with_row(index);
        let value = row
            .id()
            .filter(|v| !v.is_missing())
            .ok_or_else(|| Error::missing_column(ID_COLUMN, Some(index)).with_context(at_row()))?;
        let id = RecordId::new(value.clone()).map_err(|e| e.with_context(at_row()))?;
        if !seen.insert(id.clone()) {
            return Err(Error::duplicate_id(id).with_context(at_row()));
        }
        ids.push(id);
    }
    Ok(ids)
}

fn stage_row(batch: &mut Batch<'_>, row: &Row, id: &RecordId, options: &ReconcileOptions) -> Result<()> {
    if !batch.contains(id) {
        let tag = type_tag(row, options)?;
        let schema = batch.registry().resolve(tag)?;
        batch.add(Record::with_id(schema, id.clone()))?;
    }

    for (column, value) in row.iter() {
        if value.is_missing() || !options.writes_column(column) {
            continue;
        }
        batch.set(id, column, value.clone())?;
    }
    Ok(())
}

fn type_tag<'r>(row: &'r Row, options: &'r ReconcileOptions) -> Result<&'r str> {
    let Some(column) = &options.type_column else {
        return Ok(options.default_type.as_str());
    };
    match row.get(column) {
        None => Err(Error::missing_column(column.as_str(), None)),
        Some(value) if value.is_missing() => Err(Error::missing_column(column.as_str(), None)),
        Some(Value::String(tag)) => Ok(&**tag),
        Some(other) => Err(Error::unknown_type(
            other.to_string(),
            "type tags must be strings",
        )),
    }
}
