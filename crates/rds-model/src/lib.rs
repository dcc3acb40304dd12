//! Declarative model for rds-extract query packages.
//!
//! A [`QueryPackage`] describes the shape of an extraction once: one anchor
//! [`SourceSpec`] plus an ordered list of [`JoinSpec`]s. The query, the
//! expected schema and the clean plan are all derived from it downstream.

pub mod error;
pub mod package;
pub mod spec;

pub use error::{ConfigError, Result};
pub use package::{QueryPackage, validate_parts};
pub use spec::{CleanDirective, FieldMapping, JoinSpec, QuestionSource, SourceSpec};
