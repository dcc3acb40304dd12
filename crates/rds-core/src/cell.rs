//! Row data as returned by an executor, and its conversion into a table.

use std::collections::HashSet;

use polars::prelude::*;
use thiserror::Error;

use rds_common::format_numeric;

/// A single nullable cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn kind(&self) -> Option<Kind> {
        match self {
            Self::Null => None,
            Self::Text(_) => Some(Kind::Text),
            Self::Int(_) => Some(Kind::Int),
            Self::Float(_) => Some(Kind::Float),
            Self::Bool(_) => Some(Kind::Bool),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Column names plus row-major cells, as produced by a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryRows {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Int,
    Float,
    Bool,
}

/// Errors raised while turning [`QueryRows`] into a [`DataFrame`].
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("row {row} has {found} values but the result has {expected} columns")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column `{0}` appears more than once in the result")]
    DuplicateColumn(String),

    #[error("failed to build result table: {0}")]
    Polars(#[from] PolarsError),
}

/// Build a typed table from query rows.
///
/// Each column takes the kind of its non-null cells. Integers and floats
/// widen to float; any other mix becomes a text column with the non-text
/// cells rendered as text. A column with no non-null cell becomes a text
/// column of nulls.
pub fn materialize(rows: QueryRows) -> Result<DataFrame, MaterializeError> {
    let QueryRows { columns, rows } = rows;

    let mut seen = HashSet::new();
    for name in &columns {
        if !seen.insert(name.as_str()) {
            return Err(MaterializeError::DuplicateColumn(name.clone()));
        }
    }
    for (idx, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(MaterializeError::RowArity {
                row: idx,
                expected: columns.len(),
                found: row.len(),
            });
        }
    }

    let mut built = Vec::with_capacity(columns.len());
    for (col_idx, name) in columns.iter().enumerate() {
        let cells = rows.iter().map(|row| &row[col_idx]);
        let series = match column_kind(&rows, col_idx) {
            Kind::Text => {
                let mut builder = StringChunkedBuilder::new(name.as_str().into(), rows.len());
                for cell in cells {
                    match cell {
                        CellValue::Null => builder.append_null(),
                        CellValue::Text(s) => builder.append_value(s),
                        CellValue::Int(v) => builder.append_value(v.to_string()),
                        CellValue::Float(v) => builder.append_value(format_numeric(*v)),
                        CellValue::Bool(v) => builder.append_value(v.to_string()),
                    }
                }
                builder.finish().into_series()
            }
            Kind::Int => {
                let values: Vec<Option<i64>> = cells
                    .map(|cell| match cell {
                        CellValue::Int(v) => Some(*v),
                        _ => None,
                    })
                    .collect();
                Series::new(name.as_str().into(), values)
            }
            Kind::Float => {
                let values: Vec<Option<f64>> = cells
                    .map(|cell| match cell {
                        CellValue::Float(v) => Some(*v),
                        CellValue::Int(v) => Some(*v as f64),
                        _ => None,
                    })
                    .collect();
                Series::new(name.as_str().into(), values)
            }
            Kind::Bool => {
                let values: Vec<Option<bool>> = cells
                    .map(|cell| match cell {
                        CellValue::Bool(v) => Some(*v),
                        _ => None,
                    })
                    .collect();
                Series::new(name.as_str().into(), values)
            }
        };
        built.push(series.into_column());
    }

    Ok(DataFrame::new(built)?)
}

fn column_kind(rows: &[Vec<CellValue>], col_idx: usize) -> Kind {
    let mut resolved = None;
    for kind in rows.iter().filter_map(|row| row[col_idx].kind()) {
        resolved = match (resolved, kind) {
            (None, kind) => Some(kind),
            (Some(current), kind) if current == kind => Some(current),
            (Some(Kind::Int | Kind::Float), Kind::Int | Kind::Float) => Some(Kind::Float),
            _ => return Kind::Text,
        };
    }
    resolved.unwrap_or(Kind::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(columns: &[&str], rows: Vec<Vec<CellValue>>) -> QueryRows {
        QueryRows::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn typed_columns_and_nulls() {
        let df = materialize(rows(
            &["id", "name", "score", "ok"],
            vec![
                vec![1i64.into(), "a".into(), 1.5.into(), true.into()],
                vec![2i64.into(), CellValue::Null, CellValue::Null, false.into()],
            ],
        ))
        .unwrap();

        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("ok").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("name").unwrap().null_count(), 1);
    }

    #[test]
    fn ints_and_floats_widen() {
        let df = materialize(rows(
            &["n"],
            vec![vec![1i64.into()], vec![2.5.into()]],
        ))
        .unwrap();
        let values: Vec<_> = df.column("n").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(2.5)]);
    }

    #[test]
    fn all_null_column_is_text() {
        let df = materialize(rows(&["n"], vec![vec![CellValue::Null]])).unwrap();
        assert_eq!(df.column("n").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn mixed_kinds_fall_back_to_text() {
        let df = materialize(rows(
            &["age"],
            vec![
                vec![5i64.into()],
                vec!["".into()],
                vec![CellValue::Null],
                vec![2.5.into()],
                vec![true.into()],
            ],
        ))
        .unwrap();
        let col = df.column("age").unwrap();
        assert_eq!(col.dtype(), &DataType::String);
        let values: Vec<_> = col.str().unwrap().into_iter().collect();
        assert_eq!(
            values,
            vec![Some("5"), Some(""), None, Some("2.5"), Some("true")]
        );
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = materialize(rows(&["a", "b"], vec![vec!["x".into()]])).unwrap_err();
        assert!(matches!(
            err,
            MaterializeError::RowArity {
                row: 0,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = materialize(rows(&["a", "a"], vec![])).unwrap_err();
        assert!(matches!(err, MaterializeError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn zero_rows_keep_columns() {
        let df = materialize(rows(&["a", "b"], vec![])).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }
}
