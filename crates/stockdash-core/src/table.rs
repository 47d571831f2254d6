//! In-memory tabular snapshot of a store table.
//!
//! A `Table` is what the loader hands to the views: named columns and rows of
//! loosely typed cells. Tables are never written back.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::fmt::{format_date, parse_date};
use crate::views::ViewError;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    /// Numeric view of the cell. Text is parsed; NaN and null yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
            Value::Null | Value::Date(_) => return None,
        };
        if v.is_nan() { None } else { Some(v) }
    }

    /// Ordering by cell value: numbers before dates before text, nulls last.
    /// Ints and floats compare numerically with each other.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Int(_) | Value::Float(_) => 0,
                Value::Date(_) => 1,
                Value::Text(_) => 2,
                Value::Null => 3,
            }
        }
        fn number(v: &Value) -> f64 {
            match v {
                Value::Int(i) => *i as f64,
                Value::Float(f) => *f,
                _ => f64::NAN,
            }
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                number(self).total_cmp(&number(other))
            }
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }

    /// Date view of the cell. Text is accepted as `YYYY-MM-DD[...]`.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_date(s),
            _ => None,
        }
    }

    /// Display label used for categories (tickers, sectors, months).
    /// Returns `None` for null cells.
    pub fn label(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Date(d) => Some(format_date(*d)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Full contents of one store table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from literal rows. Convenient for fixtures.
    pub fn from_rows(name: impl Into<String>, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let mut table = Self::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Appends a row, padding with nulls or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds a column by exact name, then ASCII case-insensitively
    /// (PostgreSQL folds unquoted identifiers to lower case).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(name)))
    }

    /// Like [`Table::column_index`], but a missing column is an error.
    pub fn require_column(&self, name: &str) -> Result<usize, ViewError> {
        self.column_index(name)
            .ok_or_else(|| ViewError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Iterates over the cells of one column.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Distinct non-null labels of a column in first-appearance order.
    pub fn distinct_labels(&self, column: &str) -> Result<Vec<String>, ViewError> {
        let idx = self.require_column(column)?;
        let mut seen = std::collections::HashSet::new();
        Ok(self
            .column_values(idx)
            .filter_map(Value::label)
            .filter(|label| seen.insert(label.clone()))
            .collect())
    }

    /// Distinct non-null labels of a column, ordered by cell value.
    pub fn sorted_labels(&self, column: &str) -> Result<Vec<String>, ViewError> {
        let idx = self.require_column(column)?;
        let mut cells: Vec<&Value> = self.column_values(idx).filter(|v| !v.is_null()).collect();
        cells.sort_by(|a, b| a.sort_cmp(b));
        let mut seen = std::collections::HashSet::new();
        Ok(cells
            .into_iter()
            .filter_map(Value::label)
            .filter(|label| seen.insert(label.clone()))
            .collect())
    }
}
