use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while applying a cleaning operation.
///
/// Per-value conversion failures are not errors; they become nulls. These
/// variants cover a column that cannot be processed at all.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("{operation}: field `{field}` is not in the table")]
    MissingField {
        field: String,
        operation: &'static str,
    },

    #[error("could not convert `{field}` to dates: column type {dtype} cannot hold dates")]
    NotDates { field: String, dtype: String },

    #[error("could not convert `{field}` to integers: column type {dtype} is not numeric")]
    NotNumeric { field: String, dtype: String },

    #[error("invalid date output format `{format}` for field `{field}`")]
    InvalidFormat { field: String, format: String },

    #[error("failed to clean `{field}`: {source}")]
    Polars {
        field: String,
        #[source]
        source: PolarsError,
    },
}

impl CleanError {
    pub(crate) fn polars(field: &str) -> impl FnOnce(PolarsError) -> Self + '_ {
        move |source| Self::Polars {
            field: field.to_string(),
            source,
        }
    }
}
