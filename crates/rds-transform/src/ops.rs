//! Column cleaning operations.
//!
//! Every operation checks that its field exists first. Values that cannot be
//! converted become nulls; only a column that cannot be processed at all is
//! an error.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

use rds_common::{Numeric, any_to_numeric, is_null_or_empty};

use crate::datetime::parse_datetime;
use crate::error::CleanError;
use crate::plan::{CleanOperation, CleanStep};
use crate::removed::RemovedRows;

const MS_PER_DAY: i64 = 86_400_000;

/// Apply one plan step to a table.
pub fn apply_step(
    step: &CleanStep,
    df: DataFrame,
    removed: &mut RemovedRows,
) -> Result<DataFrame, CleanError> {
    match &step.operation {
        CleanOperation::DropIfNull => drop_if_null(&step.field, &df, removed),
        CleanOperation::ToDate { output_format } => {
            to_date(&step.field, df, output_format.as_deref())
        }
        CleanOperation::ToInteger => to_integer(&step.field, df),
    }
}

/// Keep rows whose `field` is neither null nor `""`; the rest go to `removed`.
pub fn drop_if_null(
    field: &str,
    df: &DataFrame,
    removed: &mut RemovedRows,
) -> Result<DataFrame, CleanError> {
    let column = require_column(df, field, "drop-if-null")?;

    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..column.len() {
        let value = column.get(idx).map_err(CleanError::polars(field))?;
        keep.push(!is_null_or_empty(&value));
    }
    let drop: Vec<bool> = keep.iter().map(|k| !k).collect();

    let kept = df
        .filter(&BooleanChunked::from_slice("keep".into(), &keep))
        .map_err(CleanError::polars(field))?;
    let dropped = df
        .filter(&BooleanChunked::from_slice("drop".into(), &drop))
        .map_err(CleanError::polars(field))?;

    debug!(
        field,
        before = df.height(),
        after = kept.height(),
        removed = dropped.height(),
        "dropped empty rows"
    );
    removed.push(field, dropped);
    Ok(kept)
}

/// Convert `field` to datetimes.
///
/// Without `output_format` the column becomes `Datetime(ms)`; with one it
/// becomes text rendered through that strftime pattern.
pub fn to_date(
    field: &str,
    mut df: DataFrame,
    output_format: Option<&str>,
) -> Result<DataFrame, CleanError> {
    let column = require_column(&df, field, "to-date")?;
    let millis = datetime_millis(field, column)?;
    let parsed = millis.iter().filter(|v| v.is_some()).count();

    let converted = match output_format {
        None => Series::new(field.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .map_err(CleanError::polars(field))?,
        Some(format) => render_dates(field, &millis, format)?,
    };

    debug!(field, rows = df.height(), parsed, format = output_format, "converted dates");
    df.with_column(converted).map_err(CleanError::polars(field))?;
    Ok(df)
}

/// Convert `field` to a numeric column.
///
/// The result is `Int64` unless some value has a fractional part, in which
/// case the whole column becomes `Float64`. Text that is not a number becomes
/// null.
pub fn to_integer(field: &str, mut df: DataFrame) -> Result<DataFrame, CleanError> {
    let column = require_column(&df, field, "to-integer")?;
    let dtype = column.dtype().clone();

    let converted = if dtype.is_integer() {
        column
            .cast(&DataType::Int64)
            .map_err(CleanError::polars(field))?
            .take_materialized_series()
    } else if dtype.is_float() || dtype == DataType::String || dtype == DataType::Null {
        let mut values = Vec::with_capacity(column.len());
        for idx in 0..column.len() {
            let value = column.get(idx).map_err(CleanError::polars(field))?;
            values.push(any_to_numeric(value));
        }
        numeric_series(field, &values)
    } else {
        return Err(CleanError::NotNumeric {
            field: field.to_string(),
            dtype: dtype.to_string(),
        });
    };

    debug!(
        field,
        rows = df.height(),
        dtype = %converted.dtype(),
        nulls = converted.null_count(),
        "converted numbers"
    );
    df.with_column(converted).map_err(CleanError::polars(field))?;
    Ok(df)
}

fn numeric_series(field: &str, values: &[Option<Numeric>]) -> Series {
    if values.iter().flatten().any(|v| matches!(v, Numeric::Float(_))) {
        let floats: Vec<Option<f64>> = values.iter().map(|v| v.map(Numeric::as_f64)).collect();
        Series::new(field.into(), floats)
    } else {
        let ints: Vec<Option<i64>> = values.iter().map(|v| v.and_then(Numeric::as_i64)).collect();
        Series::new(field.into(), ints)
    }
}

fn require_column<'a>(
    df: &'a DataFrame,
    field: &str,
    operation: &'static str,
) -> Result<&'a Column, CleanError> {
    df.column(field).map_err(|_| CleanError::MissingField {
        field: field.to_string(),
        operation,
    })
}

/// Column values as milliseconds since the epoch.
fn datetime_millis(field: &str, column: &Column) -> Result<Vec<Option<i64>>, CleanError> {
    let values = match column.dtype() {
        DataType::String => column
            .str()
            .map_err(CleanError::polars(field))?
            .into_iter()
            .map(|value| value.and_then(parse_datetime))
            .map(|dt| dt.map(|dt| dt.and_utc().timestamp_millis()))
            .collect(),
        DataType::Date => column
            .cast(&DataType::Int32)
            .map_err(CleanError::polars(field))?
            .i32()
            .map_err(CleanError::polars(field))?
            .into_iter()
            .map(|days| days.map(|d| i64::from(d) * MS_PER_DAY))
            .collect(),
        DataType::Datetime(unit, _) => {
            let divisor = match unit {
                TimeUnit::Nanoseconds => 1_000_000,
                TimeUnit::Microseconds => 1_000,
                TimeUnit::Milliseconds => 1,
            };
            column
                .cast(&DataType::Int64)
                .map_err(CleanError::polars(field))?
                .i64()
                .map_err(CleanError::polars(field))?
                .into_iter()
                .map(|v| v.map(|v| v.div_euclid(divisor)))
                .collect()
        }
        DataType::Null => vec![None; column.len()],
        other => {
            return Err(CleanError::NotDates {
                field: field.to_string(),
                dtype: other.to_string(),
            });
        }
    };
    Ok(values)
}

fn render_dates(field: &str, millis: &[Option<i64>], format: &str) -> Result<Series, CleanError> {
    let invalid = || CleanError::InvalidFormat {
        field: field.to_string(),
        format: format.to_string(),
    };
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    let mut builder = StringChunkedBuilder::new(field.into(), millis.len());
    let mut buf = String::new();
    for value in millis {
        match value.and_then(from_millis) {
            Some(dt) => {
                buf.clear();
                write!(buf, "{}", dt.format(format)).map_err(|_| invalid())?;
                builder.append_value(&buf);
            }
            None => builder.append_null(),
        }
    }
    Ok(builder.finish().into_series())
}

fn from_millis(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_units_normalize_to_millis() {
        let ms: i64 = 1_705_314_600_000; // 2024-01-15 10:30:00
        let df = DataFrame::new(vec![
            Series::new("at".into(), vec![Some(ms * 1_000)])
                .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
                .unwrap()
                .into_column(),
        ])
        .unwrap();

        let out = to_date("at", df, Some("%Y-%m-%d %H:%M")).unwrap();
        let col = out.column("at").unwrap().str().unwrap();
        assert_eq!(col.get(0), Some("2024-01-15 10:30"));
    }

    #[test]
    fn invalid_format_is_fatal_even_for_all_nulls() {
        let df = DataFrame::new(vec![
            Series::new("at".into(), vec![None::<&str>]).into_column(),
        ])
        .unwrap();
        let err = to_date("at", df, Some("%Q")).unwrap_err();
        assert!(matches!(err, CleanError::InvalidFormat { .. }));
    }
}
