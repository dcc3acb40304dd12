use polars::prelude::PolarsError;
use thiserror::Error;

use rds_model::ConfigError;
use rds_transform::CleanError;

use crate::cell::MaterializeError;
use crate::executor::ExecutorError;

/// Errors raised by a [`TableSession`](crate::TableSession).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("session has no query to execute")]
    MissingQuery,

    #[error("session has no expected schema to validate against")]
    MissingSchema,

    #[error("query execution failed: {0}")]
    Execution(#[source] ExecutorError),

    #[error("could not load query result: {0}")]
    Materialize(#[from] MaterializeError),

    #[error("query returned no rows")]
    EmptyResult,

    #[error(
        "query result is missing {} expected column(s): {}; inspect missing_fields() for details",
        .missing.len(),
        .missing.join(", ")
    )]
    SchemaMismatch { missing: Vec<String> },

    #[error("cleaning failed: {0}")]
    Clean(#[from] CleanError),

    #[error("no table loaded; execute the session first")]
    EmptyTable,

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
