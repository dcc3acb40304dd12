//! Clean plan resolution.
//!
//! Each join carries per-field directive names. They are resolved once,
//! against a fixed registry, into an ordered list of [`CleanStep`]s.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rds_model::{ConfigError, JoinSpec};

/// A resolved cleaning operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum CleanOperation {
    /// Remove rows whose value is null or `""`.
    DropIfNull,
    /// Parse the column into datetimes, optionally re-rendered as text.
    ToDate { output_format: Option<String> },
    /// Convert the column to 64-bit integers.
    ToInteger,
}

impl CleanOperation {
    /// Resolve a directive such as `NULL` or `date-convert:%m/%d/%Y`.
    pub fn resolve(field: &str, directive: &str) -> Result<Self, ConfigError> {
        let (name, argument) = match directive.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg)),
            None => (directive.trim(), None),
        };

        let operation = match name {
            "null-or-empty" | "NULL" => Self::DropIfNull,
            "date-convert" | "DATE_CONVERT" => {
                let output_format = argument.filter(|arg| !arg.is_empty()).map(str::to_string);
                return Ok(Self::ToDate { output_format });
            }
            "int-convert" | "INT_CONVERT" => Self::ToInteger,
            _ => {
                return Err(ConfigError::UnknownDirective {
                    field: field.to_string(),
                    directive: directive.to_string(),
                });
            }
        };

        if argument.is_some() {
            return Err(ConfigError::UnexpectedArgument {
                field: field.to_string(),
                directive: directive.to_string(),
            });
        }
        Ok(operation)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DropIfNull => "drop-if-null",
            Self::ToDate { .. } => "to-date",
            Self::ToInteger => "to-integer",
        }
    }

    /// Human-readable label used for audit snapshots.
    pub fn step_label(&self) -> &'static str {
        match self {
            Self::DropIfNull => "Clean Nulls and Empty Fields",
            Self::ToDate { .. } => "Convert String Dates to DateTimes",
            Self::ToInteger => "Convert String Numbers to Integers",
        }
    }

    pub fn removes_rows(&self) -> bool {
        matches!(self, Self::DropIfNull)
    }
}

/// One operation applied to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanStep {
    pub field: String,
    pub operation: CleanOperation,
}

impl CleanStep {
    pub fn new(field: impl Into<String>, operation: CleanOperation) -> Self {
        Self {
            field: field.into(),
            operation,
        }
    }
}

/// Ordered cleaning steps: join order, then directive order, then op order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanPlan {
    steps: Vec<CleanStep>,
}

impl CleanPlan {
    pub fn new(steps: Vec<CleanStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[CleanStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CleanStep> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<'a> IntoIterator for &'a CleanPlan {
    type Item = &'a CleanStep;
    type IntoIter = std::slice::Iter<'a, CleanStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Build the clean plan for a list of joins.
///
/// Fails on the first directive that does not resolve.
pub fn build_clean_plan(joins: &[JoinSpec]) -> Result<CleanPlan, ConfigError> {
    let mut steps = Vec::new();
    for join in joins {
        for directive in &join.clean {
            for op in &directive.ops {
                let operation = CleanOperation::resolve(&directive.field, op)?;
                steps.push(CleanStep::new(directive.field.clone(), operation));
            }
        }
    }
    debug!(steps = steps.len(), joins = joins.len(), "built clean plan");
    Ok(CleanPlan::new(steps))
}
