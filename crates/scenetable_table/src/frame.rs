//! Column-oriented tables.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use scenetable_foundation::{Error, ErrorContext, Result, Row, Table, Value};

/// A table stored as named columns of equal length.
///
/// This is the dict-of-lists shape dataframe libraries exchange; it
/// converts to and from the row-oriented [`Table`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnFrame {
    columns: Vec<(String, Vec<Value>)>,
}

impl ColumnFrame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = values,
            None => self.columns.push((name, values)),
        }
        self
    }

    /// Values of one column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Number of rows, taken from the first column.
    #[must_use]
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    /// Builds the frame of a table; absent cells become nil.
    #[must_use]
    pub fn from_table(table: &Table) -> Self {
        let columns = table
            .columns()
            .iter()
            .map(|name| {
                let values = table.column_values(name).unwrap_or_default();
                (name.clone(), values)
            })
            .collect();
        Self { columns }
    }

    /// Converts the frame to rows.
    ///
    /// # Errors
    ///
    /// Returns a missing column error naming the first column whose length
    /// differs from the first column's.
    pub fn to_table(&self) -> Result<Table> {
        let height = self.height();
        if let Some((name, values)) = self.columns.iter().find(|(_, v)| v.len() != height) {
            return Err(Error::missing_column(name.as_str(), Some(values.len().min(height)))
                .with_context(ErrorContext::new().with_operation("frame to table")));
        }

        let mut table = Table::new(self.names());
        for index in 0..height {
            let row: Row = self
                .columns
                .iter()
                .map(|(name, values)| (name.as_str(), values[index].clone()))
                .collect();
            table.push(row);
        }
        Ok(table)
    }
}

impl Serialize for ColumnFrame {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, values) in &self.columns {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

struct FrameVisitor;

impl<'de> Visitor<'de> for FrameVisitor {
    type Value = ColumnFrame;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of column names to value lists")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<ColumnFrame, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut frame = ColumnFrame::new();
        while let Some((name, values)) = access.next_entry::<String, Vec<Value>>()? {
            frame = frame.with_column(name, values);
        }
        Ok(frame)
    }
}

impl<'de> Deserialize<'de> for ColumnFrame {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(FrameVisitor)
    }
}
