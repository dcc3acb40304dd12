//! Library components of the rds-extract CLI.

pub mod export;
pub mod logging;
pub mod summary;
