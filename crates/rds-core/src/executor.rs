//! The seam between a session and whatever runs its SQL.

use thiserror::Error;

use crate::cell::QueryRows;

/// Errors returned by a [`QueryExecutor`].
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The database rejected or failed the query.
    #[error("query failed: {0}")]
    Query(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Runs one SQL string and returns its rows.
///
/// Implementations own their connection; a session only borrows the
/// executor for the duration of one `execute` call.
pub trait QueryExecutor {
    fn run_query(&mut self, sql: &str) -> Result<QueryRows, ExecutorError>;
}
