//! Cleaning tables before reconciliation.
//!
//! NaN cells become nil, so every missing cell looks the same downstream.
//! Columns declared optional are dropped whole when any of their cells
//! fails the declared type; the `id` column is never dropped.

use scenetable_foundation::{AttrType, Error, ErrorContext, ID_COLUMN, Result, Table, Value};
use tracing::warn;

/// Normalization settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizeOptions {
    optional: Vec<(String, AttrType)>,
}

impl NormalizeOptions {
    /// No optional columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `column` optional with the given expected type.
    ///
    /// Declaring `id` optional has no effect.
    #[must_use]
    pub fn optional(mut self, column: impl Into<String>, ty: AttrType) -> Self {
        self.optional.push((column.into(), ty));
        self
    }
}

/// Normalizes `table`.
///
/// # Errors
///
/// Returns a missing column error naming the first row without an id.
pub fn normalize(mut table: Table, options: &NormalizeOptions) -> Result<Table> {
    for row in table.rows_mut() {
        let nan_columns: Vec<String> = row
            .iter()
            .filter(|(_, v)| matches!(v, Value::Float(f) if f.is_nan()))
            .map(|(c, _)| c.to_string())
            .collect();
        for column in nan_columns {
            row.insert(column, Value::Nil);
        }
    }

    for (index, row) in table.rows().iter().enumerate() {
        if row.id().is_none_or(Value::is_missing) {
            return Err(Error::missing_column(ID_COLUMN, Some(index)).with_context(
                ErrorContext::new()
                    .with_operation("normalize")
                    .with_row(index),
            ));
        }
    }

    for (column, ty) in &options.optional {
        if column == ID_COLUMN {
            continue;
        }
        let Some(values) = table.column_values(column) else {
            continue;
        };
        let bad = values
            .iter()
            .filter(|v| !v.is_missing())
            .find(|v| ty.coerce(column, v).is_err());
        if let Some(value) = bad {
            warn!(%column, %value, expected = %ty, "dropping malformed optional column");
            table.drop_column(column);
        }
    }

    Ok(table)
}
