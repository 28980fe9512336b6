use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::codec::ColumnValue;

/// One result row: column names in result order, each with its decoded cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<ColumnValue>,
}

impl Row {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Add a cell. A repeated column name replaces the earlier value but
    /// keeps its position.
    pub(crate) fn insert(&mut self, column: &str, value: ColumnValue) {
        match self.columns.iter().position(|c| c == column) {
            Some(index) => self.values[index] = value,
            None => {
                self.columns.push(column.to_string());
                self.values.push(value);
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|index| &self.values[index])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[ColumnValue] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Execution metadata read from the connection once the rows are drained.
///
/// Both counters are connection-wide: they describe the most recent insert
/// and the most recent data-changing statement on the connection, which is
/// not necessarily the statement that produced this result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultInfo {
    pub insert_id: i64,
    pub affected_rows: i64,
}

/// Rows produced by one execution, plus [`ResultInfo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    rows: Vec<Row>,
    info: ResultInfo,
}

impl ResultSet {
    pub(crate) fn new(rows: Vec<Row>, info: ResultInfo) -> Self {
        Self { rows, info }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn info(&self) -> ResultInfo {
        self.info
    }

    pub fn insert_id(&self) -> i64 {
        self.info.insert_id
    }

    pub fn affected_rows(&self) -> i64 {
        self.info.affected_rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// The first column of the first row.
    pub fn first_value(&self) -> Option<&ColumnValue> {
        self.first().and_then(|row| row.values().first())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
