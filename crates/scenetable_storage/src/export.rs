//! Exporting a collection as a table.

use scenetable_foundation::{ID_COLUMN, Row, TYPE_COLUMN, Table, Value};

use crate::collection::Collection;
use crate::record::Record;

/// Which columns an export produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Attribute columns to include; `None` includes every attribute.
    pub columns: Option<Vec<String>>,
    /// Include each record's canonical type tag under [`TYPE_COLUMN`].
    pub include_type: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            columns: None,
            include_type: true,
        }
    }
}

impl ExportOptions {
    /// Every attribute plus the type column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the export to the given attribute columns.
    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method to set whether the type column is included.
    #[must_use]
    pub fn with_type(mut self, include: bool) -> Self {
        self.include_type = include;
        self
    }

    fn row(&self, record: &Record) -> Row {
        let mut row = Row::new().with(ID_COLUMN, record.id().value().clone());
        match &self.columns {
            Some(columns) => {
                for column in columns.iter().filter(|c| c.as_str() != ID_COLUMN) {
                    let value = record.get(column).cloned().unwrap_or(Value::Nil);
                    row.insert(column.as_str(), value);
                }
            }
            None => {
                for (name, value) in record.attributes() {
                    row.insert(name, value.clone());
                }
            }
        }
        if self.include_type {
            row.insert(TYPE_COLUMN, record.type_tag());
        }
        row
    }
}

impl Collection {
    /// Produces one row per record, in collection order.
    ///
    /// The `id` column is always present. Columns a record's schema does
    /// not declare are nil for that record.
    #[must_use]
    pub fn export(&self, options: &ExportOptions) -> Table {
        let mut table = match &options.columns {
            Some(columns) => {
                let mut header = vec![ID_COLUMN.to_string()];
                header.extend(columns.iter().filter(|c| c.as_str() != ID_COLUMN).cloned());
                if options.include_type {
                    header.push(TYPE_COLUMN.to_string());
                }
                Table::new(header)
            }
            None => {
                let mut header = vec![ID_COLUMN.to_string()];
                // Attribute columns come from the rows; the type column
                // only needs seeding when there are none.
                if options.include_type && self.is_empty() {
                    header.push(TYPE_COLUMN.to_string());
                }
                Table::new(header)
            }
        };
        for record in self.iter() {
            table.push(options.row(record));
        }
        table
    }
}
