//! Shared utilities for rds-extract crates.
//!
//! Cell helpers used by the cleaning operations and by duplicate-row
//! detection in sessions.

pub mod value;

pub use value::{
    Numeric, any_to_numeric, any_to_text, format_numeric, is_null_or_empty, parse_numeric,
};
