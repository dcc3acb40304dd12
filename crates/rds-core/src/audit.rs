//! Audit trail of table snapshots taken while cleaning.

use polars::prelude::DataFrame;

use rds_transform::CleanStep;

/// Where in the cleaning run a snapshot was taken.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditStage {
    /// The validated, de-duplicated table before any step.
    Original,
    /// After plan step `index` ran.
    Step { index: usize, step: CleanStep },
    /// The table handed back to the caller.
    Final,
}

/// One snapshot. Polars frames share column buffers, so a snapshot does not
/// copy the table data.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub stage: AuditStage,
    pub table: DataFrame,
}

impl AuditEntry {
    pub fn new(stage: AuditStage, table: DataFrame) -> Self {
        Self { stage, table }
    }

    pub fn label(&self) -> &'static str {
        match &self.stage {
            AuditStage::Original => "Original",
            AuditStage::Step { step, .. } => step.operation.step_label(),
            AuditStage::Final => "Final",
        }
    }

    /// Field the step touched, if this is a step snapshot.
    pub fn field(&self) -> Option<&str> {
        match &self.stage {
            AuditStage::Step { step, .. } => Some(step.field.as_str()),
            AuditStage::Original | AuditStage::Final => None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.table.height()
    }
}
