//! Cleaning pipeline for extracted tables.
//!
//! - **plan**: resolves per-field cleaning directives into an ordered [`CleanPlan`]
//! - **ops**: the cleaning operations themselves (drop-if-null, to-date, to-integer)
//! - **removed**: append-only sink for rows dropped while cleaning
//! - **datetime**: lenient date/time parsing used by `to-date`

pub mod datetime;
pub mod error;
pub mod ops;
pub mod plan;
pub mod removed;

pub use error::CleanError;
pub use ops::{apply_step, drop_if_null, to_date, to_integer};
pub use plan::{CleanOperation, CleanPlan, CleanStep, build_clean_plan};
pub use removed::{RemovedBatch, RemovedRows};
