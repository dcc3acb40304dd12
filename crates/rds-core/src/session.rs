//! The table session: one extraction from query to cleaned table.

use std::fmt;
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use rds_model::{ConfigError, QueryPackage};
use rds_query::{Schema, build_query, build_schema, derive_schema, render_validated};
use rds_transform::{CleanPlan, RemovedRows, apply_step, build_clean_plan};

use crate::audit::{AuditEntry, AuditStage};
use crate::cell::materialize;
use crate::dedupe::dedupe_rows;
use crate::error::SessionError;
use crate::executor::QueryExecutor;

/// Options shared by both session constructors.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Column names removed from the expected schema.
    pub exclude: Vec<String>,
}

impl SessionOptions {
    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }
}

/// How far the last `execute` call got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Constructed,
    Queried,
    Validated,
    Cleaned,
    Final,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constructed => "constructed",
            Self::Queried => "queried",
            Self::Validated => "validated",
            Self::Cleaned => "cleaned",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the query, expected schema and clean plan for one table, and the
/// results of the last `execute` call.
#[derive(Debug)]
pub struct TableSession {
    package: Option<QueryPackage>,
    query: String,
    schema: Schema,
    plan: CleanPlan,
    table: Option<DataFrame>,
    removed: RemovedRows,
    audit: Vec<AuditEntry>,
    missing: Vec<String>,
    state: SessionState,
}

impl TableSession {
    /// Build a session from a query package. Nothing touches the database.
    pub fn from_package(
        package: QueryPackage,
        options: &SessionOptions,
    ) -> Result<Self, SessionError> {
        package.validate()?;
        let joins = package.joins.as_slice();
        let query = render_validated(&package.source, joins);
        let schema = derive_schema(&package.source, joins).without(&options.exclude);
        let plan = build_clean_plan(joins)?;
        debug!(
            source = %package.source.table,
            joins = joins.len(),
            columns = schema.len(),
            steps = plan.len(),
            "session built from package"
        );
        Ok(Self::with_parts(Some(package), query, schema, plan))
    }

    /// Build a session from a raw query and the columns it must return.
    ///
    /// The query is used verbatim and no cleaning is planned.
    pub fn from_query(
        raw: &str,
        schema: &[String],
        options: &SessionOptions,
    ) -> Result<Self, SessionError> {
        let query = build_query(None, None, Some(raw))?;
        let schema = build_schema(
            None,
            None,
            Some(schema),
            Some(options.exclude.as_slice()),
        )?;
        Ok(Self::with_parts(None, query, schema, CleanPlan::default()))
    }

    fn with_parts(
        package: Option<QueryPackage>,
        query: String,
        schema: Schema,
        plan: CleanPlan,
    ) -> Self {
        Self {
            package,
            query,
            schema,
            plan,
            table: None,
            removed: RemovedRows::new(),
            audit: Vec::new(),
            missing: Vec::new(),
            state: SessionState::Constructed,
        }
    }

    /// Run the query, validate the result and optionally clean it.
    ///
    /// Every call starts from a clean slate: removed rows, the audit log and
    /// missing fields from an earlier call are discarded.
    pub fn execute(
        &mut self,
        executor: &mut dyn QueryExecutor,
        apply_cleaning: bool,
    ) -> Result<&DataFrame, SessionError> {
        let span = info_span!("execute", query_len = self.query.len(), apply_cleaning);
        let _guard = span.enter();
        let started = Instant::now();

        self.reset();
        if self.query.trim().is_empty() {
            return Err(SessionError::MissingQuery);
        }
        if self.schema.is_empty() {
            return Err(SessionError::MissingSchema);
        }

        let rows = executor
            .run_query(&self.query)
            .map_err(SessionError::Execution)?;
        let fetched = rows.len();
        let df = materialize(rows)?;
        if df.height() == 0 {
            return Err(SessionError::EmptyResult);
        }
        self.state = SessionState::Queried;

        let missing = self
            .schema
            .missing_from(df.get_column_names().into_iter().map(|name| name.as_str()));
        if !missing.is_empty() {
            warn!(missing = ?missing, "query result does not match expected schema");
            self.missing = missing.clone();
            return Err(SessionError::SchemaMismatch { missing });
        }

        let (df, duplicates) = dedupe_rows(&df)?;
        if duplicates > 0 {
            debug!(duplicates, "dropped duplicate rows");
        }
        self.state = SessionState::Validated;

        let df = if apply_cleaning { self.clean(df)? } else { df };
        self.state = SessionState::Final;

        info!(
            fetched,
            rows = df.height(),
            duplicates,
            removed = self.removed.row_count(),
            duration_ms = started.elapsed().as_millis() as u64,
            "session executed"
        );
        Ok(self.table.insert(df))
    }

    fn reset(&mut self) {
        self.table = None;
        self.removed.clear();
        self.audit.clear();
        self.missing.clear();
        self.state = SessionState::Constructed;
    }

    fn clean(&mut self, mut df: DataFrame) -> Result<DataFrame, SessionError> {
        let span = info_span!("clean", steps = self.plan.len());
        let _guard = span.enter();

        self.audit
            .push(AuditEntry::new(AuditStage::Original, df.clone()));
        for (index, step) in self.plan.iter().enumerate() {
            let before = df.height();
            df = apply_step(step, df, &mut self.removed)?;
            debug!(
                index,
                field = %step.field,
                operation = step.operation.name(),
                before,
                after = df.height(),
                "applied clean step"
            );
            self.audit.push(AuditEntry::new(
                AuditStage::Step {
                    index,
                    step: step.clone(),
                },
                df.clone(),
            ));
        }
        self.audit.push(AuditEntry::new(AuditStage::Final, df.clone()));
        self.state = SessionState::Cleaned;
        Ok(df)
    }

    /// Rename columns of the current table pairwise.
    ///
    /// Either every rename applies or none does.
    pub fn rename_columns(&mut self, from: &[String], to: &[String]) -> Result<(), SessionError> {
        if from.len() != to.len() {
            return Err(ConfigError::RenameArity {
                from: from.len(),
                to: to.len(),
            }
            .into());
        }
        let table = match self.table.as_ref() {
            Some(table) if table.height() > 0 => table,
            _ => return Err(SessionError::EmptyTable),
        };

        let mut renamed = table.clone();
        for (old, new) in from.iter().zip(to) {
            renamed.rename(old, new.as_str().into())?;
        }
        self.table = Some(renamed);
        Ok(())
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn clean_plan(&self) -> &CleanPlan {
        &self.plan
    }

    pub fn package(&self) -> Option<&QueryPackage> {
        self.package.as_ref()
    }

    /// The table produced by the last successful `execute`.
    pub fn table(&self) -> Option<&DataFrame> {
        self.table.as_ref()
    }

    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit
    }

    pub fn removed(&self) -> &RemovedRows {
        &self.removed
    }

    /// Expected columns absent from the last query result.
    pub fn missing_fields(&self) -> &[String] {
        &self.missing
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}
