//! Table sessions for rds-extract.
//!
//! A [`TableSession`] owns one extraction from query to cleaned table:
//! it runs the query through a caller-supplied [`QueryExecutor`], checks the
//! result against the expected schema, drops duplicate rows and applies the
//! clean plan while keeping an audit trail of every step.

pub mod audit;
pub mod cell;
pub mod dedupe;
pub mod error;
pub mod executor;
pub mod session;

pub use audit::{AuditEntry, AuditStage};
pub use cell::{CellValue, MaterializeError, QueryRows, materialize};
pub use dedupe::dedupe_rows;
pub use error::SessionError;
pub use executor::{ExecutorError, QueryExecutor};
pub use session::{SessionOptions, SessionState, TableSession};
