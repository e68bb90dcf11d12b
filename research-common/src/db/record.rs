//! Schema-less row representation
//!
//! The `runs` and `papers` tables are populated by an external pipeline and
//! carry an arbitrary set of columns. Rows are therefore decoded into an
//! ordered list of `(column, value)` pairs instead of a fixed struct.

use serde::ser::{Serialize, SerializeMap, Serializer};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, ValueRef};
use std::fmt;

/// A single SQLite scalar
///
/// Serializes to the bare JSON scalar. Non-finite reals become `null`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "null"),
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Real(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Real(value)
    }
}

/// One database row, columns in `SELECT` order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. A repeated name replaces the earlier value in place.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decode a SQLite row using the runtime storage class of each value
    pub fn from_row(row: &SqliteRow) -> Self {
        let mut record = Record::new();
        for (i, column) in row.columns().iter().enumerate() {
            record.push(column.name(), decode_cell(row, i));
        }
        record
    }
}

/// Convert one SQLite value to a `CellValue`
///
/// TEXT, INTEGER and REAL map directly; BLOB falls back to lossy UTF-8.
fn decode_cell(row: &SqliteRow, index: usize) -> CellValue {
    let is_null = row
        .try_get_raw(index)
        .map(|raw| raw.is_null())
        .unwrap_or(true);
    if is_null {
        return CellValue::Null;
    }

    row.try_get::<String, _>(index)
        .ok()
        .map(CellValue::Text)
        .or_else(|| row.try_get::<i64, _>(index).ok().map(CellValue::Integer))
        .or_else(|| row.try_get::<f64, _>(index).ok().map(CellValue::Real))
        .or_else(|| {
            row.try_get::<Vec<u8>, _>(index)
                .ok()
                .map(|bytes| CellValue::Text(String::from_utf8_lossy(&bytes).into_owned()))
        })
        .unwrap_or(CellValue::Null)
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
