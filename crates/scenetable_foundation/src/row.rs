//! Tabular representation: rows keyed by column name.

use std::fmt;

use crate::value::Value;

/// Column holding the record identifier.
pub const ID_COLUMN: &str = "id";

/// Conventional column holding a record's type tag.
pub const TYPE_COLUMN: &str = "shape_type";

/// One table row: an ordered mapping of column name to value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Row::insert`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a cell, keeping the column's position if it already exists.
    ///
    /// Returns the previous value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.cells.push((column, value));
                None
            }
        }
    }

    /// Gets a cell by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Removes a cell, returning its value.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let index = self.cells.iter().position(|(name, _)| name == column)?;
        Some(self.cells.remove(index).1)
    }

    /// Returns true if the row has a cell for `column`.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Cells in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The value of the `id` column, if present.
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.get(ID_COLUMN)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// An ordered list of rows with a known column set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for column in columns {
            table.add_column(column.into());
        }
        table
    }

    /// Builds a table from rows, taking the union of their columns in
    /// first-seen order.
    #[must_use]
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        let mut table = Self::default();
        for row in rows {
            table.push(row);
        }
        table
    }

    /// Appends a row, extending the column set with any new columns.
    pub fn push(&mut self, row: Row) {
        for column in row.columns() {
            if !self.has_column(column) {
                self.columns.push(column.to_string());
            }
        }
        self.rows.push(row);
    }

    fn add_column(&mut self, column: String) {
        if !self.has_column(&column) {
            self.columns.push(column);
        }
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if `column` is one of the table's columns.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consumes the table, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, `Nil` where a row lacks the cell.
    ///
    /// Returns `None` if the column is not part of the table.
    #[must_use]
    pub fn column_values(&self, column: &str) -> Option<Vec<Value>> {
        if !self.has_column(column) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.get(column).cloned().unwrap_or(Value::Nil))
                .collect(),
        )
    }

    /// Projects the table onto `columns`; unknown columns are ignored.
    #[must_use]
    pub fn select(&self, columns: &[&str]) -> Self {
        let kept: Vec<String> = columns
            .iter()
            .filter(|c| self.has_column(c))
            .map(|c| (*c).to_string())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|(name, _)| kept.iter().any(|k| k.as_str() == *name))
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect()
            })
            .collect();
        Self {
            columns: kept,
            rows,
        }
    }

    /// Removes a column from the table and every row.
    pub fn drop_column(&mut self, column: &str) {
        self.columns.retain(|c| c != column);
        for row in &mut self.rows {
            row.remove(column);
        }
    }

    /// Mutable access to the rows.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut()
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::from_rows(iter)
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use super::{Row, Table, Value};
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    impl Serialize for Row {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (column, value) in self.iter() {
                map.serialize_entry(column, value)?;
            }
            map.end()
        }
    }

    struct RowVisitor;

    impl<'de> Visitor<'de> for RowVisitor {
        type Value = Row;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of column names to values")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Row, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut row = Row::new();
            while let Some((column, value)) = access.next_entry::<String, Value>()? {
                row.insert(column, value);
            }
            Ok(row)
        }
    }

    impl<'de> Deserialize<'de> for Row {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_map(RowVisitor)
        }
    }

    impl Serialize for Table {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            self.rows.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Table {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            Vec::<Row>::deserialize(deserializer).map(Table::from_rows)
        }
    }
}
