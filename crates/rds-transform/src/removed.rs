//! Rows dropped during cleaning.

use polars::prelude::*;

/// Rows removed by one `drop-if-null` step.
#[derive(Debug, Clone)]
pub struct RemovedBatch {
    /// Field whose empty value caused the removal.
    pub field: String,
    pub rows: DataFrame,
}

/// Append-only sink of removed rows, one batch per removing step.
///
/// Batches keep the table layout they had when they were removed, so a
/// later conversion step never rewrites rows that are already gone.
#[derive(Debug, Clone, Default)]
pub struct RemovedRows {
    batches: Vec<RemovedBatch>,
}

impl RemovedRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record removed rows. Empty batches are not kept.
    pub fn push(&mut self, field: impl Into<String>, rows: DataFrame) {
        if rows.height() == 0 {
            return;
        }
        self.batches.push(RemovedBatch {
            field: field.into(),
            rows,
        });
    }

    pub fn batches(&self) -> &[RemovedBatch] {
        &self.batches
    }

    pub fn row_count(&self) -> usize {
        self.batches.iter().map(|b| b.rows.height()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn clear(&mut self) {
        self.batches.clear();
    }

    /// Stack all batches into one frame, in removal order.
    ///
    /// When batches disagree on column types (a conversion ran between two
    /// removals) every column is rendered as text first.
    pub fn to_frame(&self) -> PolarsResult<Option<DataFrame>> {
        let Some(first) = self.batches.first() else {
            return Ok(None);
        };
        let dtypes = first.rows.dtypes();
        let uniform = self.batches.iter().all(|b| b.rows.dtypes() == dtypes);

        let mut stacked: Option<DataFrame> = None;
        for batch in &self.batches {
            let rows = if uniform {
                batch.rows.clone()
            } else {
                stringify(&batch.rows)?
            };
            match stacked.as_mut() {
                Some(frame) => {
                    frame.vstack_mut(&rows)?;
                }
                None => stacked = Some(rows),
            }
        }
        Ok(stacked)
    }
}

fn stringify(df: &DataFrame) -> PolarsResult<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|c| c.cast(&DataType::String))
        .collect::<PolarsResult<Vec<_>>>()?;
    DataFrame::new(columns)
}
